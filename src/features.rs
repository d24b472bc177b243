// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod composition;
pub mod kmers;
pub mod physicochem;
pub mod registry;

use std::collections::HashMap;

// Feature name -> value, in insertion order. Inserting an existing name overwrites the value but
// keeps the name's original position, so merging calculator outputs into a record behaves like a
// dictionary update: last writer wins, first writer decides the column position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    names: Vec<String>,
    values: Vec<f64>,
    index: HashMap<String, usize>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.values[i] = value,
            None => {
                self.index.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.values.push(value);
            }
        }
    }

    pub fn merge(&mut self, other: FeatureMap) {
        for (name, value) in other.names.into_iter().zip(other.values) {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.values[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = FeatureMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut map = FeatureMap::new();
        map.insert("b", 1.0);
        map.insert("a", 2.0);
        map.insert("b", 3.0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(3.0));
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut first: FeatureMap = [("A", 0.5), ("C", 0.5)].into_iter().collect();
        let second: FeatureMap = [("C", 0.25), ("G", 0.75)].into_iter().collect();
        first.merge(second);
        assert_eq!(
            first.iter().collect::<Vec<_>>(),
            vec![("A", 0.5), ("C", 0.25), ("G", 0.75)]
        );
        assert!(first.contains("G"));
        assert_eq!(first.get("T"), None);
    }
}
