//! Desired-state package list
//!
//! An ordered list of package names with no duplicates. Order only matters
//! for deterministic output; entries are independent of each other.

use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of package names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PackageList {
    names: Vec<String>,
}

impl PackageList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from names, keeping the first occurrence of each duplicate
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for name in names {
            list.insert(name);
        }
        list
    }

    /// Append a name unless it is already present (exact match)
    ///
    /// Returns `true` if the name was appended.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Check membership by exact, case-sensitive match
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Sort names lexicographically
    ///
    /// Returns `true` if the order changed.
    pub fn sort(&mut self) -> bool {
        if self.is_sorted() {
            return false;
        }
        self.names.sort();
        true
    }

    /// Check if names are already in non-decreasing order
    pub fn is_sorted(&self) -> bool {
        self.names.is_sorted()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl From<Vec<String>> for PackageList {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<PackageList> for Vec<String> {
    fn from(list: PackageList) -> Self {
        list.names
    }
}

impl<'a> IntoIterator for &'a PackageList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
