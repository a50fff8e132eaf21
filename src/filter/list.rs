//! Whole-list edits. Each returns a new list; the input is never modified.
use thiserror::Error;

use crate::filter::model::{FilterEntry, FilterList};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterListError {
    #[error("filter row {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl FilterList {
    fn check_index(&self, index: usize) -> Result<(), FilterListError> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(FilterListError::IndexOutOfRange { index, len: self.0.len() })
        }
    }

    /// `prefix + [filter] + suffix`: the entry at `index` swapped for `filter`
    pub fn replaced(&self, index: usize, filter: FilterEntry) -> Result<FilterList, FilterListError> {
        self.check_index(index)?;
        let mut updated = Vec::with_capacity(self.0.len());
        updated.extend_from_slice(&self.0[..index]);
        updated.push(filter);
        updated.extend_from_slice(&self.0[index + 1..]);
        Ok(FilterList(updated))
    }

    pub fn appended(&self, filter: FilterEntry) -> FilterList {
        let mut updated = self.0.clone();
        updated.push(filter);
        FilterList(updated)
    }

    /// `prefix + suffix`: the list without the entry at `index`
    pub fn removed(&self, index: usize) -> Result<FilterList, FilterListError> {
        self.check_index(index)?;
        let mut updated = Vec::with_capacity(self.0.len() - 1);
        updated.extend_from_slice(&self.0[..index]);
        updated.extend_from_slice(&self.0[index + 1..]);
        Ok(FilterList(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::model::{Combiner, FilterCategory, FilterFunction, FilterParameter};
    use pretty_assertions::assert_eq;

    fn entry(key: &str, func: FilterFunction, parameter: f64) -> FilterEntry {
        FilterEntry {
            combiner: Combiner::And,
            category: FilterCategory::Number,
            func_name: func,
            key: key.to_string(),
            parameter: FilterParameter::Number(parameter),
        }
    }

    fn sample() -> FilterList {
        FilterList(vec![
            entry("amount", FilterFunction::Gt, 100.0),
            entry("fee", FilterFunction::Lt, 5.0),
            entry("capacity", FilterFunction::Gte, 1_000_000.0),
        ])
    }

    #[test]
    fn replace_touches_only_the_target_position() {
        let list = sample();
        for index in 0..list.len() {
            let replacement = entry("swapped", FilterFunction::Neq, 7.0);
            let updated = list.replaced(index, replacement.clone()).unwrap();
            assert_eq!(updated.len(), list.len());
            for (i, (before, after)) in list.iter().zip(updated.iter()).enumerate() {
                if i == index {
                    assert_eq!(after, &replacement);
                } else {
                    assert_eq!(after, before);
                }
            }
        }
        // the source list is untouched
        assert_eq!(list, sample());
    }

    #[test]
    fn replace_out_of_range_is_an_error() {
        let err = sample().replaced(3, entry("x", FilterFunction::Eq, 1.0)).unwrap_err();
        assert_eq!(err, FilterListError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(err.to_string(), "filter row 3 is out of range for a list of 3");
    }

    #[test]
    fn remove_resplices_the_rest() {
        let updated = sample().removed(0).unwrap();
        let keys: Vec<&str> = updated.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["fee", "capacity"]);
        assert!(FilterList::default().removed(0).is_err());
    }

    #[test]
    fn append_keeps_existing_order() {
        let updated = sample().appended(entry("new", FilterFunction::Eq, 0.0));
        let keys: Vec<&str> = updated.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["amount", "fee", "capacity", "new"]);
    }
}
