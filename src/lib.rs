#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_match)]
#![allow(clippy::collapsible_else_if)]

pub mod action;
pub mod components;
pub mod config;
pub mod dialog;
pub mod filter;
pub mod logging;
pub mod store;
pub mod tui;

// Re-export commonly used types
pub use action::Action;
pub use dialog::{FilterPopover, FilterRow};
pub use filter::{ColumnMeta, FilterEntry, FilterList};
pub use store::TableStore;
