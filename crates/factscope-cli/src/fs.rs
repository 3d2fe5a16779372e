use std::io;
use std::path::{Component, Path, PathBuf};

use factscope_archive::ContainerEntry;
use tracing::warn;

/// Map an archive entry path onto a relative filesystem path.
///
/// Returns `None` for paths that would escape the output directory
/// (absolute, drive-prefixed or containing `..`) and for empty paths.
pub fn safe_relative_path(entry_path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(entry_path).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Write every entry under `root`. Entries with unsafe paths are skipped.
/// Returns the number of files written.
pub fn write_entries(root: &Path, entries: &[ContainerEntry]) -> io::Result<usize> {
    let mut written = 0;
    for entry in entries {
        let Some(rel) = safe_relative_path(&entry.path) else {
            warn!(path = %entry.path, "skipping entry with unsafe path");
            continue;
        };
        let target = root.join(rel);
        if entry.is_directory {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &entry.content)?;
        written += 1;
    }
    Ok(written)
}
