//! Filter menu and active filter rows.

use crudtable_dom::Element;

use super::on_click;
use crate::action::Action;
use crate::action::CHANGE;
use crate::field::FILTER_PREFIX;
use crate::state::TableState;

/// Dropdown of filterable columns that have no active filter yet.
pub(super) fn menu(state: &TableState) -> Option<Element> {
    let available = state.available_filters();
    if available.is_empty() {
        return None;
    }

    let items = available.into_iter().map(|column| {
        Element::li().child(on_click(
            Element::link(state.column_label(column)),
            Action::AddFilter {
                column: column.to_string(),
            },
        ))
    });

    Some(
        Element::div()
            .class("dropdown crud-filter-menu")
            .child(Element::button("Filter").class("btn btn-default dropdown-toggle"))
            .child(Element::ul().class("dropdown-menu").children(items)),
    )
}

/// One editable row per active filter.
pub(super) fn panel(state: &TableState) -> Option<Element> {
    let filters = state.query.filters();
    if filters.is_empty() {
        return None;
    }

    let rows = filters.iter().map(|filter| {
        let operators = state
            .info
            .as_ref()
            .map(|info| info.operators(&filter.col))
            .unwrap_or(&[]);
        let select = Element::select()
            .class("form-control crud-filter-operator")
            .on(
                CHANGE,
                Action::ChangeFilterOperator {
                    column: filter.col.clone(),
                }
                .encode(),
            )
            .children(operators.iter().map(|op| {
                Element::option(op.operator.clone(), op.name.clone()).selected(op.operator == filter.opr)
            }));

        let mut input = Element::text_input(filter.value.clone())
            .id(format!("{FILTER_PREFIX}{}", filter.col))
            .class("form-control crud-filter-value")
            .on(
                CHANGE,
                Action::ChangeFilterValue {
                    column: filter.col.clone(),
                }
                .encode(),
            );
        if let Some(field) = state.filter_fields.get(&filter.col) {
            input = field.mask.attach(input);
        }

        Element::div()
            .class("crud-filter-row")
            .data("column", filter.col.clone())
            .child(Element::label(state.column_label(&filter.col)))
            .child(select)
            .child(input)
            .child(on_click(
                Element::link("").class("crud-filter-remove").child(Element::icon("fa fa-times")),
                Action::RemoveFilter {
                    column: filter.col.clone(),
                },
            ))
    });

    Some(Element::div().class("crud-filters").children(rows))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crudtable_lib::model::ColumnInfo;
    use crudtable_lib::model::FilterOperator;
    use crudtable_lib::model::ResourceInfo;

    use super::*;
    use crate::action::CLICK;

    fn state() -> TableState {
        let mut filters = BTreeMap::new();
        filters.insert(
            "name".to_string(),
            vec![
                FilterOperator::new("Starts with", "sw"),
                FilterOperator::new("Ends with", "ew"),
            ],
        );
        filters.insert("email".to_string(), vec![FilterOperator::new("Equal to", "eq")]);

        let mut state = TableState::default();
        state.info = Some(ResourceInfo {
            add_columns: vec![ColumnInfo::new("name", "Name", "String")],
            filters,
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_menu_lists_inactive_columns() {
        let mut state = state();
        let menu = menu(&state).unwrap();
        let links: Vec<_> = menu.child_elements()[1]
            .child_elements()
            .iter()
            .map(|li| li.text_content())
            .collect();
        assert_eq!(links, vec!["email", "Name"]);

        state.query.add_filter("name", "sw", "");
        state.query.add_filter("email", "eq", "");
        assert!(super::menu(&state).is_none());
    }

    #[test]
    fn test_panel_row_controls() {
        let mut state = state();
        assert!(panel(&state).is_none());

        state.query.add_filter("name", "ew", "Ad");
        let panel = panel(&state).unwrap();
        let row = &panel.child_elements()[0];
        let controls = row.child_elements();
        assert_eq!(controls[0].text_content(), "Name");

        let selected: Vec<_> = controls[1]
            .child_elements()
            .iter()
            .filter(|o| o.selected)
            .filter_map(|o| o.get_attr("value"))
            .collect();
        assert_eq!(selected, vec!["ew"]);

        assert_eq!(controls[2].get_attr("value"), Some("Ad"));
        assert_eq!(controls[2].id.as_deref(), Some("filter-name"));
        assert_eq!(
            controls[3].handler(CLICK),
            Some(Action::RemoveFilter { column: "name".into() }.encode().as_str())
        );
    }
}
