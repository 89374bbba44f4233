//! Find and clear use cases
//!
//! Both drive a [`Traversal`] and answer each directory candidate:
//! `find` stops below matching directories in top-only mode, `clear` stops
//! below directories whose tags it just removed.

use crate::domain::{TagSet, TagStore, Traversal};
use crate::error::{Result, TaggerError};
use crate::infrastructure::filesystem::resolve_entry;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Options for `find`
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    /// Only report the shallowest match of each branch
    pub top_only: bool,

    /// Expansion layers below the root (None = unbounded)
    pub max_depth: Option<usize>,
}

/// Options for `clear`
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearOptions {
    pub recursive: bool,
    pub top_only: bool,
    pub max_depth: Option<usize>,
}

/// Tag containment search and bulk clearing
pub struct QueryEngine<S: TagStore> {
    store: S,
}

impl<S: TagStore> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        QueryEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Entries under `root` whose tags contain every tag of `query`.
    ///
    /// A file root is checked on its own. Missing roots give no results.
    /// Results are absolute paths in sorted order.
    pub fn find(&self, root: &Path, query: &TagSet, options: FindOptions) -> Vec<PathBuf> {
        let Ok(root) = resolve_entry(root) else {
            return Vec::new();
        };

        if !root.is_dir() {
            return if self.store.read(&root).is_superset(query) {
                vec![root]
            } else {
                Vec::new()
            };
        }

        let Ok(mut walk) = Traversal::new(&self.store, &root, options.max_depth) else {
            return Vec::new();
        };

        let mut found = BTreeSet::new();
        while let Some(candidate) = walk.next_candidate() {
            let matched = self.store.read(&candidate.path).is_superset(query);
            if candidate.is_dir {
                walk.resume(matched && options.top_only);
            }
            if matched {
                found.insert(candidate.path);
            }
        }

        found.into_iter().collect()
    }

    /// Remove tags from `root`, or from everything beneath it when recursive.
    ///
    /// Returns the number of entries whose tags were removed.
    pub fn clear(&self, root: &Path, options: ClearOptions) -> Result<usize> {
        let root = resolve_entry(root)?;

        if !options.recursive || !root.is_dir() {
            let had_tags = !self.store.read(&root).is_empty();
            self.store.write(&root, &TagSet::new())?;
            return Ok(usize::from(had_tags));
        }

        let mut walk = Traversal::new(&self.store, &root, options.max_depth)?;
        let mut cleared = 0;

        while let Some(candidate) = walk.next_candidate() {
            let had_tags = !self.store.read(&candidate.path).is_empty();
            if had_tags {
                match self.store.write(&candidate.path, &TagSet::new()) {
                    Ok(()) => cleared += 1,
                    Err(TaggerError::PathNotFound(path)) => {
                        tracing::debug!("Entry vanished during clear: {}", path.display());
                    }
                    Err(e) => return Err(e),
                }
            }
            if candidate.is_dir {
                // A record holding only its files' tags does not make the
                // directory a tagged node; keep searching below it.
                walk.resume(had_tags && options.top_only);
            }
        }

        Ok(cleared)
    }
}
