//! Option lists for the select controls and the lookups against them
use crate::filter::model::{ColumnMeta, Combiner, FilterCategory, FilterFunction};

/// A selectable `{value, label}` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
}

impl<T> SelectOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self { value, label: label.into() }
    }
}

/// Result of looking a value up in an option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Found(SelectOption<T>),
    NotFound,
}

impl<T> Selection<T> {
    pub fn option(&self) -> Option<&SelectOption<T>> {
        match self {
            Selection::Found(opt) => Some(opt),
            Selection::NotFound => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.option().map(|opt| &opt.value)
    }

    pub fn label(&self) -> Option<&str> {
        self.option().map(|opt| opt.label.as_str())
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Selection::Found(_))
    }
}

/// Combiners offered to the user. `Or` is reserved and left out.
pub fn combiner_options() -> Vec<SelectOption<Combiner>> {
    vec![SelectOption::new(Combiner::And, "And")]
}

pub fn function_options(category: FilterCategory) -> Vec<SelectOption<FilterFunction>> {
    category
        .functions()
        .iter()
        .map(|func| SelectOption::new(*func, func.label()))
        .collect()
}

/// One option per column, ascending by heading. The sort is stable, so
/// equal headings keep their input order.
pub fn column_options(columns: &[ColumnMeta]) -> Vec<SelectOption<String>> {
    let mut options: Vec<SelectOption<String>> = columns
        .iter()
        .map(|column| SelectOption::new(column.key.clone(), column.heading.clone()))
        .collect();
    options.sort_by(|a, b| a.label.cmp(&b.label));
    options
}

/// Value-equality lookup
pub fn select<T: PartialEq + Clone>(options: &[SelectOption<T>], value: &T) -> Selection<T> {
    options
        .iter()
        .find(|opt| &opt.value == value)
        .cloned()
        .map(Selection::Found)
        .unwrap_or(Selection::NotFound)
}

/// Option after the current selection, wrapping. With nothing selected the first option is picked.
pub fn next_option<'a, T: PartialEq>(options: &'a [SelectOption<T>], current: Option<&T>) -> Option<&'a SelectOption<T>> {
    let idx = current.and_then(|value| options.iter().position(|opt| &opt.value == value));
    match idx {
        Some(i) => options.get((i + 1) % options.len()),
        None => options.first(),
    }
}

/// Option before the current selection, wrapping. With nothing selected the last option is picked.
pub fn prev_option<'a, T: PartialEq>(options: &'a [SelectOption<T>], current: Option<&T>) -> Option<&'a SelectOption<T>> {
    let idx = current.and_then(|value| options.iter().position(|opt| &opt.value == value));
    match idx {
        Some(0) | None => options.last(),
        Some(i) => options.get(i - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels<T>(options: &[SelectOption<T>]) -> Vec<&str> {
        options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn number_functions_and_labels() {
        let options = function_options(FilterCategory::Number);
        let values: Vec<FilterFunction> = options.iter().map(|o| o.value).collect();
        assert_eq!(
            values,
            vec![
                FilterFunction::Eq,
                FilterFunction::Neq,
                FilterFunction::Gt,
                FilterFunction::Gte,
                FilterFunction::Lt,
                FilterFunction::Lte,
            ]
        );
        assert_eq!(labels(&options), vec!["=", "≠", ">", ">=", "<", "<="]);
    }

    #[test]
    fn string_functions_and_labels() {
        let options = function_options(FilterCategory::String);
        let values: Vec<FilterFunction> = options.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![FilterFunction::Includes, FilterFunction::NotInclude]);
        assert_eq!(labels(&options), vec!["Include", "Not include"]);
    }

    #[test]
    fn only_and_is_offered() {
        assert_eq!(combiner_options(), vec![SelectOption::new(Combiner::And, "And")]);
        assert_eq!(select(&combiner_options(), &Combiner::Or), Selection::NotFound);
    }

    #[test]
    fn columns_sort_by_label_case_sensitive() {
        let columns = vec![
            ColumnMeta::new("fee", "fee"),
            ColumnMeta::new("amount", "Amount"),
            ColumnMeta::new("capacity", "Capacity"),
        ];
        let options = column_options(&columns);
        // uppercase sorts before lowercase
        assert_eq!(labels(&options), vec!["Amount", "Capacity", "fee"]);
    }

    #[test]
    fn columns_with_equal_labels_keep_input_order() {
        let columns = vec![
            ColumnMeta::new("b_local", "Balance"),
            ColumnMeta::new("alias", "Alias"),
            ColumnMeta::new("b_remote", "Balance"),
            ColumnMeta::new("b_total", "Balance"),
        ];
        let keys: Vec<String> = column_options(&columns).into_iter().map(|o| o.value).collect();
        assert_eq!(keys, vec!["alias", "b_local", "b_remote", "b_total"]);
    }

    #[test]
    fn select_reports_misses_explicitly() {
        let options = column_options(&[ColumnMeta::new("amount", "Amount")]);
        assert_eq!(
            select(&options, &"amount".to_string()),
            Selection::Found(SelectOption::new("amount".to_string(), "Amount"))
        );
        let miss = select(&options, &"gone".to_string());
        assert!(!miss.is_found());
        assert_eq!(miss.label(), None);
    }

    #[test]
    fn cycling_wraps_and_recovers_from_misses() {
        let options = function_options(FilterCategory::String);
        let includes = FilterFunction::Includes;
        let not_include = FilterFunction::NotInclude;
        assert_eq!(next_option(&options, Some(&includes)).map(|o| o.value), Some(not_include));
        assert_eq!(next_option(&options, Some(&not_include)).map(|o| o.value), Some(includes));
        assert_eq!(prev_option(&options, Some(&includes)).map(|o| o.value), Some(not_include));
        // a numeric function is not in the string list
        assert_eq!(next_option(&options, Some(&FilterFunction::Gt)).map(|o| o.value), Some(includes));
        assert_eq!(prev_option(&options, None).map(|o| o.value), Some(not_include));
        assert!(next_option::<FilterFunction>(&[], None).is_none());
    }
}
