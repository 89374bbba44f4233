//! Tag sets
//!
//! A [`TagSet`] holds the tags of one entry. Tags are opaque, case-sensitive
//! strings; the set is always iterated in lexicographic order.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// True when every tag of `query` is present here.
    ///
    /// An empty query is contained in every set, including the empty one.
    pub fn is_superset(&self, query: &TagSet) -> bool {
        self.tags.is_superset(&query.tags)
    }

    pub fn union(&self, other: &TagSet) -> TagSet {
        TagSet {
            tags: self.tags.union(&other.tags).cloned().collect(),
        }
    }

    pub fn difference(&self, other: &TagSet) -> TagSet {
        TagSet {
            tags: self.tags.difference(&other.tags).cloned().collect(),
        }
    }

    /// Tags in lexicographic order.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagSet {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}
