//! Merge use case
//!
//! Collects the shallowest entries matching a query and copies them into one
//! destination directory, which is then tagged with the query itself.

use crate::application::query::{FindOptions, QueryEngine};
use crate::domain::{unique_target, TagSet, TagStore};
use crate::error::{Result, TaggerError};
use crate::infrastructure::filesystem::{copy_tree, remove_entry, resolve_entry};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Resolved destination directory
    pub destination: PathBuf,

    /// Paths created inside the destination, in processing order
    pub merged: Vec<PathBuf>,

    /// Matches that could not be copied
    pub skipped: Vec<PathBuf>,
}

impl MergeReport {
    /// True when every match was copied
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Default skip handler: log and continue
pub fn log_skip(path: &Path, error: &TaggerError) {
    tracing::warn!("Skipping {}: {}", path.display(), error);
}

/// Service for merging tagged entries into one directory
pub struct MergeEngine<S: TagStore> {
    query: QueryEngine<S>,
}

impl<S: TagStore> MergeEngine<S> {
    pub fn new(store: S) -> Self {
        MergeEngine {
            query: QueryEngine::new(store),
        }
    }

    /// Merge with the default skip handler, [`log_skip`].
    pub fn merge(&self, root: &Path, dest: &Path, query: &TagSet) -> Result<MergeReport> {
        self.merge_with(root, dest, query, log_skip)
    }

    /// Copy the top-level matches of `query` under `root` into `dest`.
    ///
    /// `on_skip` is called for every match that fails to copy; the merge
    /// continues with the next one and nothing is rolled back.
    ///
    /// # Errors
    ///
    /// - `NotADirectory` if `root` is not a directory or `dest` exists as a file
    /// - `Io` if `dest` cannot be created
    /// - `WriteFailure` if the destination cannot be tagged
    pub fn merge_with<F>(
        &self,
        root: &Path,
        dest: &Path,
        query: &TagSet,
        mut on_skip: F,
    ) -> Result<MergeReport>
    where
        F: FnMut(&Path, &TaggerError),
    {
        let root = resolve_entry(root)?;
        if !root.is_dir() {
            return Err(TaggerError::NotADirectory(root));
        }

        if dest.exists() {
            if !dest.is_dir() {
                return Err(TaggerError::NotADirectory(dest.to_path_buf()));
            }
        } else {
            fs::create_dir_all(dest)?;
        }
        let dest = resolve_entry(dest)?;

        let options = FindOptions {
            top_only: true,
            max_depth: None,
        };
        let matches = self.query.find(&root, query, options);

        let mut report = MergeReport {
            destination: dest.clone(),
            merged: Vec::new(),
            skipped: Vec::new(),
        };

        for source in matches {
            match self.relocate(&source, &dest) {
                Ok(target) => report.merged.push(target),
                Err(e) => {
                    on_skip(&source, &e);
                    report.skipped.push(source);
                }
            }
        }

        let store = self.query.store();
        let dest_tags = store.read(&dest).union(query);
        if !dest_tags.is_empty() {
            store.write(&dest, &dest_tags)?;
        }

        tracing::info!(
            "Merged {} entries into {} ({} skipped)",
            report.merged.len(),
            dest.display(),
            report.skipped.len()
        );

        Ok(report)
    }

    /// Copy one match into `dest` under a free name, carrying its tags.
    ///
    /// A failed copy leaves nothing behind at the target name.
    fn relocate(&self, source: &Path, dest: &Path) -> Result<PathBuf> {
        let name = source
            .file_name()
            .ok_or_else(|| TaggerError::NoFileName(source.to_path_buf()))?;
        if source.is_dir() && dest.starts_with(source) {
            return Err(TaggerError::DestinationInsideSource {
                dest: dest.to_path_buf(),
                source: source.to_path_buf(),
            });
        }
        let target = unique_target(dest, name, |p| p.symlink_metadata().is_ok());

        if let Err(e) = self.copy_with_tags(source, &target) {
            if let Err(cleanup) = remove_entry(&target) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(
                        "Failed to remove partial copy {}: {}",
                        target.display(),
                        cleanup
                    );
                }
            }
            return Err(e);
        }

        Ok(target)
    }

    fn copy_with_tags(&self, source: &Path, target: &Path) -> Result<()> {
        let store = self.query.store();

        if source.is_dir() {
            copy_tree(source, target)?;
            store.rebase_subtree(source, target)
        } else {
            fs::copy(source, target)?;
            let tags = store.read(source);
            if tags.is_empty() {
                Ok(())
            } else {
                store.write(target, &tags)
            }
        }
    }
}
