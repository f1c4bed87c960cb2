//! A set of entity labels discovered on one dimension.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Members are unique; iteration is sorted by label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    identifier: usize,
    dimension: usize,
    members: BTreeSet<String>,
}

impl Cluster {
    pub fn new(identifier: usize, dimension: usize) -> Self {
        Self {
            identifier,
            dimension,
            members: BTreeSet::new(),
        }
    }

    /// Returns `false` if the label was already a member.
    pub fn add(&mut self, label: impl Into<String>) -> bool {
        self.members.insert(label.into())
    }

    #[inline]
    pub fn identifier(&self) -> usize {
        self.identifier
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.members.contains(label)
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for Cluster {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.members.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a Cluster {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cluster {} (dimension {}): {} members",
            self.identifier,
            self.dimension,
            self.members.len()
        )
    }
}
