//! Pruning-aware, depth-layered directory traversal
//!
//! [`Traversal`] is a pull cursor. Each call to [`Traversal::next_candidate`]
//! produces one entry. After a directory candidate the caller answers with
//! [`Traversal::resume`]: `stop = true` prunes the directory's subtree,
//! `stop = false` schedules its children for the next layer.
//!
//! Directories whose store probe is negative are never produced. Their
//! subdirectories are explored at the same depth and their files are skipped.
//!
//! Depth counts expansion layers below the root. The root itself is a
//! depth-0 candidate, so `max_depth = Some(0)` yields at most the root.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use tagger::domain::Traversal;
//! use tagger::infrastructure::SidecarStore;
//!
//! let store = SidecarStore::default();
//! let mut walk = Traversal::new(&store, Path::new("."), Some(2)).unwrap();
//! while let Some(candidate) = walk.next_candidate() {
//!     println!("{}", candidate.path.display());
//!     if candidate.is_dir {
//!         walk.resume(false);
//!     }
//! }
//! ```

use crate::domain::TagStore;
use crate::error::{Result, TaggerError};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// An entry produced by the traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Resumable traversal cursor
pub struct Traversal<'s, S: TagStore + ?Sized> {
    store: &'s S,
    max_depth: Option<usize>,
    depth: usize,
    /// Directories of the current layer not yet probed.
    pending_dirs: VecDeque<PathBuf>,
    /// Files of the current layer not yet produced.
    pending_files: VecDeque<PathBuf>,
    /// Directories confirmed for expansion into the next layer.
    expand: Vec<PathBuf>,
    /// Directory produced last, waiting for the caller's decision.
    awaiting: Option<PathBuf>,
}

impl<'s, S: TagStore + ?Sized> Traversal<'s, S> {
    /// Start a traversal at `root`, which must be an existing directory.
    pub fn new(store: &'s S, root: &Path, max_depth: Option<usize>) -> Result<Self> {
        let root = fs::canonicalize(root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TaggerError::PathNotFound(root.to_path_buf())
            } else {
                TaggerError::Io(e)
            }
        })?;
        if !root.is_dir() {
            return Err(TaggerError::NotADirectory(root));
        }

        Ok(Traversal {
            store,
            max_depth,
            depth: 0,
            pending_dirs: VecDeque::from([root]),
            pending_files: VecDeque::new(),
            expand: Vec::new(),
            awaiting: None,
        })
    }

    /// Answer the last directory candidate.
    ///
    /// Has no effect when no directory is waiting for a decision.
    pub fn resume(&mut self, stop: bool) {
        if let Some(dir) = self.awaiting.take() {
            if !stop {
                self.expand.push(dir);
            }
        }
    }

    /// Produce the next candidate, or `None` once the walk is exhausted.
    ///
    /// A directory left unanswered is treated as `resume(false)`.
    pub fn next_candidate(&mut self) -> Option<Candidate> {
        self.resume(false);

        loop {
            if let Some(path) = self.pending_files.pop_front() {
                return Some(Candidate {
                    path,
                    is_dir: false,
                });
            }

            if let Some(dir) = self.pending_dirs.pop_front() {
                if self.store.may_hold_tags(&dir) {
                    self.awaiting = Some(dir.clone());
                    return Some(Candidate {
                        path: dir,
                        is_dir: true,
                    });
                }
                let (subdirs, _) = self.children(&dir);
                self.pending_dirs.extend(subdirs);
                continue;
            }

            if self.expand.is_empty() {
                return None;
            }
            if self.max_depth.is_some_and(|max| self.depth >= max) {
                self.expand.clear();
                return None;
            }

            self.depth += 1;
            for dir in std::mem::take(&mut self.expand) {
                let (subdirs, files) = self.children(&dir);
                self.pending_dirs.extend(subdirs);
                self.pending_files.extend(files);
            }
        }
    }

    /// Direct subdirectories and files of `dir`, each sorted by name.
    ///
    /// Unreadable directories and vanished entries are skipped.
    fn children(&self, dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut subdirs = Vec::new();
        let mut files = Vec::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                return (subdirs, files);
            }
        };

        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                subdirs.push(path);
            } else if !self.store.is_metadata(&path) {
                files.push(path);
            }
        }

        subdirs.sort();
        files.sort();
        (subdirs, files)
    }
}
