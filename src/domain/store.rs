//! Tag storage abstraction
//!
//! The traversal and query engines only talk to a [`TagStore`]. The sidecar
//! backend in `infrastructure::sidecar` is the shipped implementation.

use crate::domain::TagSet;
use crate::error::Result;
use std::path::Path;
use walkdir::WalkDir;

/// Per-entry tag storage
pub trait TagStore {
    /// Tags of `path`. Missing paths and unreadable records yield an empty set.
    fn read(&self, path: &Path) -> TagSet;

    /// Replace the tags of `path`. An empty set removes the entry.
    fn write(&self, path: &Path, tags: &TagSet) -> Result<()>;

    /// Pruning probe for a directory.
    ///
    /// Returning `true` is always correct. `false` means no tag of the
    /// directory or of its direct files can exist.
    fn may_hold_tags(&self, dir: &Path) -> bool;

    /// True for files the store uses for its own bookkeeping.
    fn is_metadata(&self, _path: &Path) -> bool {
        false
    }

    /// Remove entries for paths that no longer exist from the record scoped
    /// to `dir`. Returns the number of entries removed.
    fn sync(&self, dir: &Path) -> Result<usize>;

    /// Make the tags recorded beneath `from` visible beneath `to`, after the
    /// subtree has been copied there.
    fn rebase_subtree(&self, from: &Path, to: &Path) -> Result<()> {
        for entry in WalkDir::new(from).into_iter().filter_map(|e| e.ok()) {
            if self.is_metadata(entry.path()) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(from) else {
                continue;
            };
            let tags = self.read(entry.path());
            let target = to.join(rel);
            if !tags.is_empty() && target.exists() {
                self.write(&target, &tags)?;
            }
        }
        Ok(())
    }
}

impl<S: TagStore + ?Sized> TagStore for &S {
    fn read(&self, path: &Path) -> TagSet {
        (**self).read(path)
    }

    fn write(&self, path: &Path, tags: &TagSet) -> Result<()> {
        (**self).write(path, tags)
    }

    fn may_hold_tags(&self, dir: &Path) -> bool {
        (**self).may_hold_tags(dir)
    }

    fn is_metadata(&self, path: &Path) -> bool {
        (**self).is_metadata(path)
    }

    fn sync(&self, dir: &Path) -> Result<usize> {
        (**self).sync(dir)
    }

    fn rebase_subtree(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).rebase_subtree(from, to)
    }
}
