//! Add, remove, get and sync use cases

use crate::domain::{TagSet, TagStore};
use crate::error::{Result, TaggerError};
use crate::infrastructure::filesystem::resolve_entry;
use std::path::Path;
use walkdir::WalkDir;

/// Service for per-entry tag bookkeeping
pub struct TagService<S: TagStore> {
    store: S,
}

impl<S: TagStore> TagService<S> {
    /// Create new tag service
    pub fn new(store: S) -> Self {
        TagService { store }
    }

    /// Add tags to an existing entry. Returns the resulting tags.
    ///
    /// # Errors
    ///
    /// - `NoTags` if `tags` is empty
    /// - `PathNotFound` if the entry does not exist
    /// - `WriteFailure` if the record cannot be written
    pub fn add(&self, path: &Path, tags: &TagSet) -> Result<TagSet> {
        if tags.is_empty() {
            return Err(TaggerError::NoTags);
        }
        let entry = resolve_entry(path)?;

        let updated = self.store.read(&entry).union(tags);
        self.store.write(&entry, &updated)?;
        Ok(updated)
    }

    /// Remove tags from an existing entry. Absent tags are ignored.
    pub fn remove(&self, path: &Path, tags: &TagSet) -> Result<TagSet> {
        let entry = resolve_entry(path)?;

        let current = self.store.read(&entry);
        let updated = current.difference(tags);
        if updated != current {
            self.store.write(&entry, &updated)?;
        }
        Ok(updated)
    }

    /// Tags of an entry in lexicographic order; empty for missing paths.
    pub fn get(&self, path: &Path) -> Vec<String> {
        self.store.read(path).to_sorted_vec()
    }

    /// Drop record entries whose paths no longer exist.
    ///
    /// With `recursive`, every record beneath a directory is synced.
    /// Returns the number of entries removed.
    pub fn sync(&self, path: &Path, recursive: bool) -> Result<usize> {
        let entry = resolve_entry(path)?;
        if !recursive || !entry.is_dir() {
            return self.store.sync(&entry);
        }

        let mut removed = 0;
        for dir in WalkDir::new(&entry)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
        {
            if self.store.may_hold_tags(dir.path()) {
                removed += self.store.sync(dir.path())?;
            }
        }
        Ok(removed)
    }
}
