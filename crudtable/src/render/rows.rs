//! Table body.

use crudtable_dom::Element;
use crudtable_lib::model::ItemId;
use crudtable_lib::model::Permissions;

use super::has_row_actions;
use super::on_click;
use crate::action::Action;
use crate::state::TableState;

pub(super) fn body(state: &TableState, permissions: &Permissions) -> Element {
    let result = &state.result;
    let with_actions = has_row_actions(permissions);

    if result.is_empty() {
        let span = result.list_columns.len() + usize::from(with_actions);
        return Element::tbody().child(
            Element::tr().child(
                Element::td()
                    .class("crud-empty")
                    .attr("colspan", span.max(1).to_string())
                    .child(Element::text("No records found")),
            ),
        );
    }

    let rows = result.iter().map(|(id, row)| {
        let mut tr = Element::tr().data("id", id.to_string());
        if with_actions {
            tr = tr.child(row_actions(id, permissions));
        }
        tr.children(
            result
                .list_columns
                .iter()
                .map(|column| Element::td().child(Element::text(row.display(column)))),
        )
    });
    Element::tbody().children(rows)
}

/// Show, edit and delete buttons; each only with its permission.
fn row_actions(id: &ItemId, permissions: &Permissions) -> Element {
    let button = |icon: &str, title: &str, action: Action| {
        on_click(
            Element::link("")
                .class("btn btn-sm btn-default")
                .attr("title", title)
                .child(Element::icon(icon)),
            action,
        )
    };

    let show = permissions
        .show
        .then(|| button("fa fa-search", "Show record", Action::Show { id: id.clone() }));
    let edit = permissions
        .edit
        .then(|| button("fa fa-edit", "Edit record", Action::Edit { id: id.clone() }));
    let delete = permissions.delete.then(|| {
        button(
            "fa fa-trash",
            "Delete record",
            Action::RequestDelete { id: id.clone() },
        )
    });

    Element::td()
        .class("crud-actions")
        .maybe_child(show)
        .maybe_child(edit)
        .maybe_child(delete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CLICK;

    #[test]
    fn test_row_actions_follow_permissions() {
        let permissions = Permissions {
            show: true,
            delete: true,
            ..Default::default()
        };
        let cell = row_actions(&ItemId::Int(3), &permissions);
        let titles: Vec<_> = cell
            .child_elements()
            .iter()
            .filter_map(|b| b.get_attr("title"))
            .collect();
        assert_eq!(titles, vec!["Show record", "Delete record"]);
        assert_eq!(
            cell.child_elements()[1].handler(CLICK),
            Some(Action::RequestDelete { id: ItemId::Int(3) }.encode().as_str())
        );
    }

    #[test]
    fn test_empty_body() {
        let mut state = TableState::default();
        state.result.list_columns = vec!["name".into()];
        let tbody = body(&state, &Permissions::all());
        let cell = &tbody.child_elements()[0].child_elements()[0];
        assert_eq!(cell.get_attr("colspan"), Some("2"));
        assert_eq!(cell.text_content(), "No records found");
    }
}
