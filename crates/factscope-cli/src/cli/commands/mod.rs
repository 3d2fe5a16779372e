pub mod archive;
mod dispatch;
pub mod render;

pub use dispatch::dispatch;
