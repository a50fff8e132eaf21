//! Filter descriptor types shared between the popover and whatever executes the filters
use derive_deref::Deref;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use thousands::Separable;

/// How an entry joins the entries before it
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Combiner {
    #[default]
    And,
    /// Reserved. Decodes, but is never offered as an option.
    Or,
}

/// Data type of a column; decides which functions apply
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCategory {
    #[default]
    Number,
    String,
}

const NUMBER_FUNCTIONS: [FilterFunction; 6] = [
    FilterFunction::Eq,
    FilterFunction::Neq,
    FilterFunction::Gt,
    FilterFunction::Gte,
    FilterFunction::Lt,
    FilterFunction::Lte,
];

const STRING_FUNCTIONS: [FilterFunction; 2] = [FilterFunction::Includes, FilterFunction::NotInclude];

impl FilterCategory {
    /// Comparison functions valid for this category, in display order
    pub fn functions(self) -> &'static [FilterFunction] {
        match self {
            FilterCategory::Number => &NUMBER_FUNCTIONS,
            FilterCategory::String => &STRING_FUNCTIONS,
        }
    }

    /// Operand used for freshly added rows
    pub fn default_parameter(self) -> FilterParameter {
        match self {
            FilterCategory::Number => FilterParameter::Number(0.0),
            FilterCategory::String => FilterParameter::Text(String::new()),
        }
    }
}

/// Comparison function identifier. Serialized as `eq`, `neq`, ..., `notInclude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FilterFunction {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Includes,
    NotInclude,
}

impl FilterFunction {
    pub fn label(self) -> &'static str {
        match self {
            FilterFunction::Eq => "=",
            FilterFunction::Neq => "≠",
            FilterFunction::Gt => ">",
            FilterFunction::Gte => ">=",
            FilterFunction::Lt => "<",
            FilterFunction::Lte => "<=",
            FilterFunction::Includes => "Include",
            FilterFunction::NotInclude => "Not include",
        }
    }
}

/// Comparison operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterParameter {
    Number(f64),
    Text(String),
}

impl Default for FilterParameter {
    fn default() -> Self {
        FilterParameter::Number(0.0)
    }
}

impl std::fmt::Display for FilterParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterParameter::Number(n) => write!(f, "{}", n.separate_with_commas()),
            FilterParameter::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One row of the filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    pub combiner: Combiner,
    pub category: FilterCategory,
    pub func_name: FilterFunction,
    pub key: String,
    pub parameter: FilterParameter,
}

impl FilterEntry {
    /// Placeholder row: first column by label, that column's category
    /// (number when unknown), the category's first function, a zero operand.
    pub fn placeholder(columns: &[ColumnMeta]) -> Self {
        let first = crate::filter::options::column_options(columns)
            .into_iter()
            .next()
            .map(|opt| opt.value);
        let category = first
            .as_ref()
            .and_then(|key| columns.iter().find(|c| &c.key == key))
            .and_then(|c| c.category)
            .unwrap_or_default();
        FilterEntry {
            combiner: Combiner::And,
            category,
            func_name: category.functions()[0],
            key: first.unwrap_or_default(),
            parameter: category.default_parameter(),
        }
    }

    /// One-line description, e.g. `amount > 1,000`
    pub fn summary(&self) -> String {
        format!("{} {} {}", self.key, self.func_name.label(), self.parameter)
    }
}

/// Ordered filter expression; all entries are AND-combined
#[derive(Debug, Clone, Default, PartialEq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterList(pub Vec<FilterEntry>);

impl From<Vec<FilterEntry>> for FilterList {
    fn from(entries: Vec<FilterEntry>) -> Self {
        FilterList(entries)
    }
}

/// Column metadata supplied by the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub key: String,
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FilterCategory>,
}

impl ColumnMeta {
    pub fn new(key: impl Into<String>, heading: impl Into<String>) -> Self {
        Self { key: key.into(), heading: heading.into(), category: None }
    }

    pub fn with_category(mut self, category: FilterCategory) -> Self {
        self.category = Some(category);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn entry_uses_descriptor_field_names() {
        let entry = FilterEntry {
            combiner: Combiner::And,
            category: FilterCategory::Number,
            func_name: FilterFunction::Gt,
            key: "amount".to_string(),
            parameter: FilterParameter::Number(100.0),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "combiner": "and",
                "category": "number",
                "funcName": "gt",
                "key": "amount",
                "parameter": 100.0
            })
        );
    }

    #[test]
    fn text_parameter_decodes_for_string_rows() {
        let entry: FilterEntry = serde_json::from_str(
            r#"{"combiner":"and","category":"string","funcName":"notInclude","key":"alias","parameter":"node"}"#,
        )
        .unwrap();
        assert_eq!(entry.func_name, FilterFunction::NotInclude);
        assert_eq!(entry.parameter, FilterParameter::Text("node".to_string()));
    }

    #[test]
    fn unknown_category_is_a_decode_error() {
        let decoded = serde_json::from_str::<FilterEntry>(
            r#"{"combiner":"and","category":"date","funcName":"eq","key":"k","parameter":1}"#,
        );
        assert!(decoded.is_err());
    }

    #[test]
    fn every_function_belongs_to_exactly_one_category() {
        for func in FilterFunction::iter() {
            let owners = FilterCategory::iter()
                .filter(|cat| cat.functions().contains(&func))
                .count();
            assert_eq!(owners, 1, "{func} should belong to one category");
        }
    }

    #[test]
    fn number_parameter_displays_grouped() {
        assert_eq!(FilterParameter::Number(0.0).to_string(), "0");
        assert_eq!(FilterParameter::Number(100.0).to_string(), "100");
        assert_eq!(FilterParameter::Number(100_000.0).to_string(), "100,000");
        assert_eq!(FilterParameter::Number(1234567.5).to_string(), "1,234,567.5");
        assert_eq!(FilterParameter::Number(-98765.25).to_string(), "-98,765.25");
    }

    #[test]
    fn function_display_matches_wire_identifier() {
        assert_eq!(FilterFunction::NotInclude.to_string(), "notInclude");
        assert_eq!(FilterFunction::Gte.to_string(), "gte");
    }

    #[test]
    fn placeholder_follows_first_column_by_label() {
        let columns = vec![
            ColumnMeta::new("peer", "Peer").with_category(FilterCategory::String),
            ColumnMeta::new("alias", "Alias").with_category(FilterCategory::String),
            ColumnMeta::new("amount", "Amount"),
        ];
        let entry = FilterEntry::placeholder(&columns);
        assert_eq!(entry.key, "alias");
        assert_eq!(entry.category, FilterCategory::String);
        assert_eq!(entry.func_name, FilterFunction::Includes);
        assert_eq!(entry.parameter, FilterParameter::Text(String::new()));
    }

    #[test]
    fn placeholder_without_columns_is_numeric() {
        let entry = FilterEntry::placeholder(&[]);
        assert_eq!(entry.key, "");
        assert_eq!(entry.category, FilterCategory::Number);
        assert_eq!(entry.func_name, FilterFunction::Eq);
        assert_eq!(entry.parameter, FilterParameter::Number(0.0));
    }
}
