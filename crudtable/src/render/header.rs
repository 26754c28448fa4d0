//! Table header with sort controls.

use crudtable_dom::Element;
use crudtable_lib::api::query::Direction;
use crudtable_lib::model::Permissions;

use super::has_row_actions;
use super::on_click;
use crate::action::Action;
use crate::state::TableState;

/// Icon class and marker for a column's sort state.
fn sort_indicator(direction: Option<Direction>) -> (&'static str, &'static str) {
    match direction {
        None => ("fa fa-sort", "none"),
        Some(Direction::Asc) => ("fa fa-arrow-up", "asc"),
        Some(Direction::Desc) => ("fa fa-arrow-down", "desc"),
    }
}

pub(super) fn header(state: &TableState, permissions: &Permissions) -> Element {
    let mut row = Element::tr();
    if has_row_actions(permissions) {
        row = row.child(Element::th().class("crud-actions"));
    }

    for column in &state.result.list_columns {
        let (icon, marker) = sort_indicator(state.query.direction_of(column));
        let link = on_click(
            Element::link(state.result.label(column)),
            Action::ToggleOrder {
                column: column.clone(),
            },
        );
        row = row.child(
            Element::th()
                .data("column", column.clone())
                .data("sort", marker)
                .child(link)
                .child(Element::icon(icon)),
        );
    }

    Element::thead().child(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator() {
        assert_eq!(sort_indicator(None).1, "none");
        assert_eq!(sort_indicator(Some(Direction::Asc)), ("fa fa-arrow-up", "asc"));
        assert_eq!(sort_indicator(Some(Direction::Desc)), ("fa fa-arrow-down", "desc"));
    }

    #[test]
    fn test_header_cells() {
        let mut state = TableState::default();
        state.result.list_columns = vec!["name".into(), "email".into()];
        state.result.label_columns.insert("name".into(), "Name".into());
        state.query.toggle_order("name");
        state.query.toggle_order("name");

        let thead = header(&state, &Permissions::default());
        let cells = thead.child_elements()[0].child_elements();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].text_content(), "Name");
        assert_eq!(cells[0].get_data("sort"), Some("desc"));
        assert_eq!(cells[1].text_content(), "email");
        assert_eq!(cells[1].get_data("sort"), Some("none"));

        let thead = header(&state, &Permissions::all());
        assert_eq!(thead.child_elements()[0].child_elements().len(), 3);
    }
}
