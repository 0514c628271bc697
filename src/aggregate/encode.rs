//! Categorical encoding for country and date columns.
//!
//! Codes are dense (`0..len`) and assigned in first-seen order, so the same
//! input sequence always yields the same codes.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalEncoding<T: Eq + Hash> {
    levels: Vec<T>,
    #[serde(skip)]
    index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> CategoricalEncoding<T> {
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut levels = Vec::new();
        let mut index = HashMap::new();
        for v in values {
            if !index.contains_key(v) {
                index.insert(v.clone(), levels.len());
                levels.push(v.clone());
            }
        }
        Self { levels, index }
    }

    pub fn code(&self, value: &T) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn level(&self, code: usize) -> Option<&T> {
        self.levels.get(code)
    }

    pub fn levels(&self) -> &[T] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_first_seen_order() {
        let values = ["US", "CA", "US", "DE", "CA"];
        let enc = CategoricalEncoding::from_values(values.iter());
        assert_eq!(enc.len(), 3);
        assert_eq!(enc.code(&"US"), Some(0));
        assert_eq!(enc.code(&"CA"), Some(1));
        assert_eq!(enc.code(&"DE"), Some(2));
        assert_eq!(enc.code(&"FR"), None);
        assert_eq!(enc.level(2), Some(&"DE"));
    }

    #[test]
    fn encoding_is_stable_across_runs() {
        let values = [3, 1, 3, 2];
        let a = CategoricalEncoding::from_values(values.iter());
        let b = CategoricalEncoding::from_values(values.iter());
        assert_eq!(a.levels(), b.levels());
    }
}
