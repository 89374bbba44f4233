#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tagger::domain::{TagSet, TagStore};
use tagger::infrastructure::SidecarStore;
use tempfile::TempDir;

pub fn tagger_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagger").unwrap();
    cmd.env_remove("TAGGER_CONFIG");
    cmd.env_remove("TAGGER_LOG");
    cmd
}

pub fn tags(items: &[&str]) -> TagSet {
    items.iter().copied().collect()
}

/// tmp0/{tmp1/tmp3/, tmp2/, tmpf}, untagged
pub struct Tree {
    _temp: TempDir,
    pub base: PathBuf,
    pub root: PathBuf,
    pub store: SidecarStore,
}

impl Tree {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let root = base.join("tmp0");
        fs::create_dir_all(root.join("tmp1/tmp3")).unwrap();
        fs::create_dir_all(root.join("tmp2")).unwrap();
        fs::write(root.join("tmpf"), "test").unwrap();
        Tree {
            _temp: temp,
            base,
            root,
            store: SidecarStore::default(),
        }
    }

    /// tmp0{test2,test3}, tmp0/tmp1{test1}, tmp0/tmp1/tmp3{test1}, tmp0/tmpf{test1}
    pub fn scenario() -> Self {
        let tree = Tree::new();
        tree.tag("", &["test2", "test3"]);
        tree.tag("tmp1", &["test1"]);
        tree.tag("tmp1/tmp3", &["test1"]);
        tree.tag("tmpf", &["test1"]);
        tree
    }

    /// Path below the root; "" is the root itself
    pub fn path(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    pub fn paths(&self, rels: &[&str]) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = rels.iter().map(|r| self.path(r)).collect();
        paths.sort();
        paths
    }

    pub fn tag(&self, rel: &str, items: &[&str]) {
        let path = self.path(rel);
        let current = self.store.read(&path);
        self.store.write(&path, &current.union(&tags(items))).unwrap();
    }

    pub fn tags_of(&self, path: &Path) -> Vec<String> {
        self.store.read(path).to_sorted_vec()
    }
}

/// Names of the direct subdirectories and files of `dir`, sidecars excluded
pub fn listing(dir: &Path) -> (Vec<String>, Vec<String>) {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().unwrap().is_dir() {
            dirs.push(name);
        } else if name != ".tag" {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();
    (dirs, files)
}
