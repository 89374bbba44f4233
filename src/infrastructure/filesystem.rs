//! Filesystem helpers shared by the store and the use cases

use crate::error::{Result, TaggerError};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Absolute, resolved form of an existing path.
pub fn resolve_entry(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TaggerError::PathNotFound(path.to_path_buf())
        } else {
            TaggerError::Io(e)
        }
    })
}

/// Write `content` to a temp file beside `path`, then rename it into place.
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp_name = format!(
        "{}.tagger-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("record"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content)?;

    if cfg!(windows) && path.exists() {
        // rename does not replace on Windows
        fs::remove_file(path)?;
    }

    fs::rename(&tmp_path, path)
}

/// Recursively copy directory `from` to the new path `to`, files and all.
///
/// Symlinks are recreated as links with the same target, dangling or not.
pub fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(rel);

        if entry.path_is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(link)?, target)
}

#[cfg(windows)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    let points_to = fs::read_link(link)?;
    if link.is_dir() {
        std::os::windows::fs::symlink_dir(points_to, target)
    } else {
        std::os::windows::fs::symlink_file(points_to, target)
    }
}

/// Remove whatever sits at `path`, directory or not.
pub fn remove_entry(path: &Path) -> std::io::Result<()> {
    let metadata = path.symlink_metadata()?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
