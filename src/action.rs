use serde::{Deserialize, Serialize};
use strum::Display;

use crate::filter::FilterList;

/// High-level actions that can be triggered by UI or components.
#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize)]
pub enum Action {
    Quit,
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Backspace,
    ToggleInstructions,
    /// Open or close the filter popover
    TogglePopover,
    /// Append a placeholder filter row
    AddFilter,
    /// Remove the selected filter row
    RemoveFilter,
    /// Replace the shared filter list wholesale
    UpdateFilters { filters: FilterList },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        let a1 = Action::TogglePopover;
        let a2 = Action::UpdateFilters { filters: FilterList::default() };
        assert_eq!(format!("{a1}"), "TogglePopover");
        assert_eq!(format!("{a2}"), "UpdateFilters");
    }

    #[test]
    fn test_unit_actions_deserialize_from_names() {
        let action: Action = serde_json::from_str("\"RemoveFilter\"").unwrap();
        assert_eq!(action, Action::RemoveFilter);
    }
}
