//! Exit codes for the factscope CLI.
//! These codes are part of the public contract.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_UNAVAILABLE: i32 = 1; // Archive missing, or rendered without details
pub const EXIT_CONFIG_ERROR: i32 = 2; // Bad flags, environment or input files
