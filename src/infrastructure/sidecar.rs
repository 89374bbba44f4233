//! Sidecar file tag store
//!
//! Every directory `D` may hold one record file (default `.tag`) with a JSON
//! object mapping absolute paths to tag arrays. The record covers `D` itself
//! and the files directly inside `D`; each subdirectory keeps its own record.
//!
//! ```text
//! {
//!   "/home/me/photos": ["travel"],
//!   "/home/me/photos/beach.jpg": ["summer", "travel"]
//! }
//! ```

use crate::domain::{TagSet, TagStore};
use crate::error::{Result, TaggerError};
use crate::infrastructure::filesystem::{resolve_entry, write_atomic};
use crate::infrastructure::Config;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

type Record = BTreeMap<String, Vec<String>>;

/// File identity used to decide whether a cached record is still current
#[derive(Debug, Clone, PartialEq, Eq)]
struct Stamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl Stamp {
    fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Stamp {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug, Clone)]
struct CachedRecord {
    path: PathBuf,
    stamp: Stamp,
    record: Record,
}

/// Tag store backed by per-directory sidecar files
///
/// The last record parsed by `read` is kept, so reading the files of one
/// directory in a row parses its record once.
#[derive(Debug, Clone)]
pub struct SidecarStore {
    sidecar_name: String,
    cache: RefCell<Option<CachedRecord>>,
}

impl Default for SidecarStore {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SidecarStore {
    pub fn new(sidecar_name: impl Into<String>) -> Self {
        SidecarStore {
            sidecar_name: sidecar_name.into(),
            cache: RefCell::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sidecar_name.clone())
    }

    /// Record file responsible for a resolved entry
    fn record_path(&self, entry: &Path) -> PathBuf {
        if entry.is_dir() {
            entry.join(&self.sidecar_name)
        } else {
            match entry.parent() {
                Some(parent) => parent.join(&self.sidecar_name),
                None => entry.join(&self.sidecar_name),
            }
        }
    }

    /// Read a record; missing or malformed records are empty
    fn load(&self, record: &Path) -> Record {
        let contents = match fs::read_to_string(record) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("Unreadable tag record {}: {}", record.display(), e);
                }
                return Record::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::debug!("Ignoring malformed tag record {}: {}", record.display(), e);
            Record::new()
        })
    }

    /// Tags stored under `key` in `record`, reusing the cached parse while
    /// the file's size and modification time are unchanged
    fn lookup(&self, record: &Path, key: &str) -> TagSet {
        let Some(stamp) = Stamp::of(record) else {
            return TagSet::new();
        };

        if let Some(cached) = self.cache.borrow().as_ref() {
            if cached.path == record && cached.stamp == stamp {
                return Self::tags_in(&cached.record, key);
            }
        }

        let map = self.load(record);
        let tags = Self::tags_in(&map, key);
        *self.cache.borrow_mut() = Some(CachedRecord {
            path: record.to_path_buf(),
            stamp,
            record: map,
        });
        tags
    }

    fn tags_in(record: &Record, key: &str) -> TagSet {
        record
            .get(key)
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Persist a record; an empty record deletes the file
    fn save(&self, record: &Path, map: &Record) -> Result<()> {
        *self.cache.borrow_mut() = None;

        let failure = |source: std::io::Error| TaggerError::WriteFailure {
            path: record.to_path_buf(),
            source,
        };

        if map.is_empty() {
            return match fs::remove_file(record) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(failure(e)),
            };
        }

        let json = serde_json::to_string_pretty(map)?;
        write_atomic(record, &json).map_err(failure)
    }

    fn key(entry: &Path) -> String {
        entry.to_string_lossy().into_owned()
    }
}

impl TagStore for SidecarStore {
    fn read(&self, path: &Path) -> TagSet {
        let Ok(entry) = resolve_entry(path) else {
            return TagSet::new();
        };
        self.lookup(&self.record_path(&entry), &Self::key(&entry))
    }

    fn write(&self, path: &Path, tags: &TagSet) -> Result<()> {
        let entry = resolve_entry(path)?;
        let record_path = self.record_path(&entry);
        let mut record = self.load(&record_path);

        if tags.is_empty() {
            if record.remove(&Self::key(&entry)).is_none() {
                return Ok(());
            }
        } else {
            record.insert(Self::key(&entry), tags.to_sorted_vec());
        }

        self.save(&record_path, &record)
    }

    fn may_hold_tags(&self, dir: &Path) -> bool {
        dir.join(&self.sidecar_name).is_file()
    }

    fn is_metadata(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name == self.sidecar_name.as_str())
    }

    fn sync(&self, dir: &Path) -> Result<usize> {
        let entry = resolve_entry(dir)?;
        let record_path = self.record_path(&entry);
        let mut record = self.load(&record_path);

        let before = record.len();
        record.retain(|key, _| Path::new(key).exists());
        let removed = before - record.len();

        if removed > 0 {
            self.save(&record_path, &record)?;
        }
        Ok(removed)
    }

    /// Rewrites the keys of every record copied beneath `to`.
    ///
    /// Keys outside `from` cannot belong to the copy and are dropped.
    fn rebase_subtree(&self, from: &Path, to: &Path) -> Result<()> {
        let from = resolve_entry(from)?;
        let to = resolve_entry(to)?;

        let records = WalkDir::new(&to)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_metadata(e.path()));

        for record_entry in records {
            let record = self.load(record_entry.path());
            let rebased: Record = record
                .into_iter()
                .filter_map(|(key, tags)| {
                    let rel = Path::new(&key).strip_prefix(&from).ok()?;
                    Some((Self::key(&to.join(rel)), tags))
                })
                .collect();
            self.save(record_entry.path(), &rebased)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::filesystem::copy_tree;
    use tempfile::TempDir;

    fn tags(items: &[&str]) -> TagSet {
        items.iter().copied().collect()
    }

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("file.txt"), "content").unwrap();
        (temp, root)
    }

    #[test]
    fn test_read_untagged_is_empty() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        assert!(store.read(&root).is_empty());
        assert!(store.read(&root.join("file.txt")).is_empty());
        assert!(store.read(&root.join("missing")).is_empty());
    }

    #[test]
    fn test_directory_and_file_share_record() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root, &tags(&["dir"])).unwrap();
        store.write(&root.join("file.txt"), &tags(&["file"])).unwrap();

        let record: Record =
            serde_json::from_str(&fs::read_to_string(root.join(".tag")).unwrap()).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record[&SidecarStore::key(&root)], vec!["dir"]);
        assert_eq!(
            record[&SidecarStore::key(&root.join("file.txt"))],
            vec!["file"]
        );
    }

    #[test]
    fn test_subdirectory_owns_its_record() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root.join("sub"), &tags(&["inner"])).unwrap();

        assert!(root.join("sub/.tag").exists());
        assert!(!root.join(".tag").exists());
        assert_eq!(store.read(&root.join("sub")), tags(&["inner"]));
    }

    #[test]
    fn test_relative_and_absolute_paths_agree() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store
            .write(&root.join("sub/../file.txt"), &tags(&["x"]))
            .unwrap();
        assert_eq!(store.read(&root.join("file.txt")), tags(&["x"]));
    }

    #[test]
    fn test_empty_write_deletes_record() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root.join("file.txt"), &tags(&["a"])).unwrap();
        assert!(root.join(".tag").exists());

        store.write(&root.join("file.txt"), &TagSet::new()).unwrap();
        assert!(!root.join(".tag").exists());
    }

    #[test]
    fn test_empty_write_without_record_is_noop() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root, &TagSet::new()).unwrap();
        assert!(!root.join(".tag").exists());
    }

    #[test]
    fn test_write_missing_path_fails() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        assert!(matches!(
            store.write(&root.join("missing"), &tags(&["a"])),
            Err(TaggerError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_record_reads_empty_and_is_overwritten() {
        let (_temp, root) = setup();
        fs::write(root.join(".tag"), "not json {").unwrap();
        let store = SidecarStore::default();

        assert!(store.read(&root).is_empty());
        assert!(store.may_hold_tags(&root));

        store.write(&root, &tags(&["fresh"])).unwrap();
        assert_eq!(store.read(&root), tags(&["fresh"]));
    }

    #[test]
    fn test_probe_follows_record_existence() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        assert!(!store.may_hold_tags(&root));
        store.write(&root.join("file.txt"), &tags(&["a"])).unwrap();
        assert!(store.may_hold_tags(&root));
        assert!(!store.may_hold_tags(&root.join("sub")));
    }

    #[test]
    fn test_custom_sidecar_name() {
        let (_temp, root) = setup();
        let store = SidecarStore::new(".meta");
        store.write(&root, &tags(&["a"])).unwrap();
        assert!(root.join(".meta").exists());
        assert!(!root.join(".tag").exists());
        assert!(store.is_metadata(&root.join(".meta")));
        assert!(!store.is_metadata(&root.join(".tag")));
    }

    #[test]
    fn test_sync_drops_dangling_entries() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root, &tags(&["keep"])).unwrap();
        store.write(&root.join("file.txt"), &tags(&["gone"])).unwrap();
        fs::remove_file(root.join("file.txt")).unwrap();

        assert_eq!(store.sync(&root).unwrap(), 1);
        fs::write(root.join("file.txt"), "again").unwrap();
        assert!(store.read(&root.join("file.txt")).is_empty());
        assert_eq!(store.read(&root), tags(&["keep"]));
    }

    #[test]
    fn test_sync_deletes_emptied_record() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root.join("file.txt"), &tags(&["gone"])).unwrap();
        fs::remove_file(root.join("file.txt")).unwrap();

        assert_eq!(store.sync(&root).unwrap(), 1);
        assert!(!root.join(".tag").exists());
    }

    #[test]
    fn test_sync_missing_path() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        assert!(matches!(
            store.sync(&root.join("missing")),
            Err(TaggerError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_rebase_subtree_rewrites_keys() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        let src = root.join("sub");
        fs::create_dir(src.join("nested")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        store.write(&src, &tags(&["top"])).unwrap();
        store.write(&src.join("a.txt"), &tags(&["file"])).unwrap();
        store.write(&src.join("nested"), &tags(&["deep"])).unwrap();

        let dst = root.join("copy");
        copy_tree(&src, &dst).unwrap();
        store.rebase_subtree(&src, &dst).unwrap();

        assert_eq!(store.read(&dst), tags(&["top"]));
        assert_eq!(store.read(&dst.join("a.txt")), tags(&["file"]));
        assert_eq!(store.read(&dst.join("nested")), tags(&["deep"]));
        // the source is untouched
        assert_eq!(store.read(&src.join("a.txt")), tags(&["file"]));
    }

    #[test]
    fn test_files_of_one_directory_share_a_cached_record() {
        let (_temp, root) = setup();
        fs::write(root.join("other.txt"), "other").unwrap();
        let store = SidecarStore::default();
        store.write(&root.join("file.txt"), &tags(&["a"])).unwrap();
        store.write(&root.join("other.txt"), &tags(&["b"])).unwrap();

        assert_eq!(store.read(&root.join("file.txt")), tags(&["a"]));
        let cached = store.cache.borrow().as_ref().map(|c| c.path.clone());
        assert_eq!(cached, Some(root.join(".tag")));
        assert_eq!(store.read(&root.join("other.txt")), tags(&["b"]));
    }

    #[test]
    fn test_read_after_own_write_is_current() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root.join("file.txt"), &tags(&["a"])).unwrap();
        assert_eq!(store.read(&root.join("file.txt")), tags(&["a"]));

        store.write(&root.join("file.txt"), &tags(&["b"])).unwrap();
        assert_eq!(store.read(&root.join("file.txt")), tags(&["b"]));

        store.write(&root.join("file.txt"), &TagSet::new()).unwrap();
        assert!(store.read(&root.join("file.txt")).is_empty());
    }

    #[test]
    fn test_read_sees_record_rewritten_elsewhere() {
        let (_temp, root) = setup();
        let store = SidecarStore::default();
        store.write(&root.join("file.txt"), &tags(&["a"])).unwrap();
        assert_eq!(store.read(&root.join("file.txt")), tags(&["a"]));

        let mut record = Record::new();
        record.insert(
            SidecarStore::key(&root.join("file.txt")),
            vec!["changed".to_string(), "elsewhere".to_string()],
        );
        fs::write(root.join(".tag"), serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(
            store.read(&root.join("file.txt")),
            tags(&["changed", "elsewhere"])
        );

        fs::remove_file(root.join(".tag")).unwrap();
        assert!(store.read(&root.join("file.txt")).is_empty());
    }
}
