pub mod list;
pub mod model;
pub mod options;
pub mod param;

pub use list::FilterListError;
pub use model::{ColumnMeta, Combiner, FilterCategory, FilterEntry, FilterFunction, FilterList, FilterParameter};
pub use options::{SelectOption, Selection, column_options, combiner_options, function_options, select};
pub use param::{NumberInput, parse_number_input};
