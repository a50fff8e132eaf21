pub mod filter_popover;
pub mod filter_row;

pub use filter_popover::{ClickTarget, FilterPopover, PopoverFocus};
pub use filter_row::{FilterRow, RowField, RowUpdate, RowView};
