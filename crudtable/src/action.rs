//! User actions.
//!
//! Rendered controls carry their action as a JSON string in a handler
//! (`data-on-click`, `data-on-change`). The host decodes it with
//! [`Action::decode`] and hands it to
//! [`TableController::handle`](crate::TableController::handle) together with
//! the control's current value where the action needs one.

use crudtable_lib::model::ItemId;
use serde::Deserialize;
use serde::Serialize;

use crate::error::TableError;

/// Event names used by rendered handlers.
pub const CLICK: &str = "click";
pub const CHANGE: &str = "change";
pub const INPUT: &str = "input";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    // Query
    ToggleOrder { column: String },
    ChangePage { page: i64 },
    ChangePageSize { size: usize },
    Refresh,

    // Filters; value-carrying actions read the control's value
    AddFilter { column: String },
    RemoveFilter { column: String },
    ChangeFilterValue { column: String },
    ChangeFilterOperator { column: String },

    // Rows
    Show { id: ItemId },
    CloseShow,
    Edit { id: ItemId },
    RequestDelete { id: ItemId },
    ConfirmDelete,
    CancelDelete,

    // Add form
    OpenAdd,
    CloseAdd,
    ChangeField { field: String },
    SubmitAdd,

    DismissNotice { id: u64 },
}

impl Action {
    /// Encode for a handler attribute.
    pub fn encode(&self) -> String {
        // Serializing a plain enum of strings and integers cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(encoded: &str) -> Result<Self, TableError> {
        serde_json::from_str(encoded).map_err(TableError::Action)
    }

    /// Returns `true` if handling needs the control's current value.
    pub fn needs_value(&self) -> bool {
        matches!(
            self,
            Self::ChangeFilterValue { .. } | Self::ChangeFilterOperator { .. } | Self::ChangeField { .. }
        )
    }
}

/// Result of handling an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// State changed; re-render.
    Changed,
    /// Nothing to do.
    Unchanged,
    /// The table does not handle this action itself (e.g. edit navigation).
    Delegated(Action),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_shape() {
        let action = Action::ToggleOrder {
            column: "name".into(),
        };
        assert_eq!(action.encode(), r#"{"action":"toggle_order","column":"name"}"#);
        assert_eq!(Action::Refresh.encode(), r#"{"action":"refresh"}"#);
    }

    #[test]
    fn test_decode() {
        let action = Action::decode(r#"{"action":"request_delete","id":7}"#).unwrap();
        assert_eq!(action, Action::RequestDelete { id: ItemId::Int(7) });

        let action = Action::decode(&Action::Show { id: "abc".into() }.encode()).unwrap();
        assert_eq!(action, Action::Show { id: ItemId::Text("abc".into()) });

        assert!(matches!(Action::decode("{\"action\":\"explode\"}"), Err(TableError::Action(_))));
    }
}
