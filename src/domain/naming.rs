//! Collision-free target names

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// First path `dir/name`, `dir/name_1`, `dir/name_2`, ... for which
/// `exists` returns false.
pub fn unique_target<F>(dir: &Path, name: &OsStr, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let candidate = dir.join(name);
    if !exists(&candidate) {
        return candidate;
    }

    let mut suffix = 1usize;
    loop {
        let mut numbered = OsString::from(name);
        numbered.push(format!("_{}", suffix));
        let candidate = dir.join(numbered);
        if !exists(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn taken(paths: &[&str]) -> HashSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_free_name_is_kept() {
        let used = taken(&[]);
        let target = unique_target(Path::new("/dest"), OsStr::new("tmp1"), |p| {
            used.contains(p)
        });
        assert_eq!(target, PathBuf::from("/dest/tmp1"));
    }

    #[test]
    fn test_first_collision_gets_suffix_one() {
        let used = taken(&["/dest/tmp1"]);
        let target = unique_target(Path::new("/dest"), OsStr::new("tmp1"), |p| {
            used.contains(p)
        });
        assert_eq!(target, PathBuf::from("/dest/tmp1_1"));
    }

    #[test]
    fn test_suffixes_probe_in_order() {
        let used = taken(&["/dest/a.txt", "/dest/a.txt_1", "/dest/a.txt_2"]);
        let target = unique_target(Path::new("/dest"), OsStr::new("a.txt"), |p| {
            used.contains(p)
        });
        assert_eq!(target, PathBuf::from("/dest/a.txt_3"));
    }

    #[test]
    fn test_gap_is_reused() {
        let used = taken(&["/dest/x", "/dest/x_2"]);
        let target = unique_target(Path::new("/dest"), OsStr::new("x"), |p| used.contains(p));
        assert_eq!(target, PathBuf::from("/dest/x_1"));
    }
}
