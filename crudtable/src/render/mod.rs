//! Rendering: pure functions from table state to an element tree.
//!
//! Controls carry encoded [`Action`]s in `click`, `change` and `input`
//! handlers. Nothing here touches the network or mutates state.

mod filters;
mod forms;
mod header;
mod pagination;
mod rows;

use crudtable_dom::Element;
use crudtable_lib::model::Permissions;

pub use pagination::page_window;

use crate::action::Action;
use crate::action::CLICK;
use crate::config::TableConfig;
use crate::notice::Notices;
use crate::state::TableState;

/// Render a whole table.
pub fn table(resource: &str, state: &TableState, config: &TableConfig) -> Element {
    let permissions = state
        .info
        .as_ref()
        .map(|info| info.permissions)
        .unwrap_or_default();

    let mut root = Element::div()
        .id(format!("crud-{resource}"))
        .class("crud-table")
        .maybe_child(notices(&state.notices))
        .child(toolbar(state, config, &permissions))
        .maybe_child(filters::panel(state))
        .child(
            Element::table()
                .class("table table-hover")
                .child(header::header(state, &permissions))
                .child(rows::body(state, &permissions)),
        )
        .child(
            Element::div()
                .class("crud-footer")
                .child(record_count(state.result.count))
                .maybe_child(pagination::pagination(state, config)),
        )
        .maybe_child(forms::show_dialog(state))
        .maybe_child(forms::add_form(state))
        .maybe_child(forms::delete_confirm(state));

    if state.loading {
        root = root.class("loading");
    }
    root
}

/// Attach an action to the click handler of a control.
pub(crate) fn on_click(element: Element, action: Action) -> Element {
    element.on(CLICK, action.encode())
}

/// Whether any per-row button is rendered.
pub(crate) fn has_row_actions(permissions: &Permissions) -> bool {
    permissions.show || permissions.edit || permissions.delete
}

fn notices(notices: &Notices) -> Option<Element> {
    if notices.is_empty() {
        return None;
    }

    let alerts = notices.iter().map(|notice| {
        Element::div()
            .class("alert")
            .class(&format!("alert-{}", notice.level.css()))
            .data("notice", notice.id.to_string())
            .child(Element::text(notice.message.clone()))
            .child(on_click(
                Element::button("\u{d7}").class("close"),
                Action::DismissNotice { id: notice.id },
            ))
    });
    Some(Element::div().class("crud-notices").children(alerts))
}

fn toolbar(state: &TableState, config: &TableConfig, permissions: &Permissions) -> Element {
    let add = permissions.add.then(|| {
        on_click(
            Element::button("Add").class("btn btn-primary crud-add-button"),
            Action::OpenAdd,
        )
    });

    Element::div()
        .class("crud-toolbar")
        .maybe_child(add)
        .maybe_child(filters::menu(state))
        .child(page_size_menu(state.query.page_size(), config))
        .child(on_click(
            Element::button("Refresh").class("btn btn-default crud-refresh"),
            Action::Refresh,
        ))
}

fn page_size_menu(current: usize, config: &TableConfig) -> Element {
    let items = config.page_size_options.iter().map(|&size| {
        let item = Element::li().child(on_click(
            Element::link(size.to_string()),
            Action::ChangePageSize { size },
        ));
        if size == current { item.class("active") } else { item }
    });

    Element::div()
        .class("dropdown crud-page-size")
        .child(Element::button(format!("Page size: {current}")).class("btn btn-default dropdown-toggle"))
        .child(Element::ul().class("dropdown-menu").children(items))
}

fn record_count(count: usize) -> Element {
    Element::div()
        .class("crud-record-count")
        .child(Element::strong("Record Count:"))
        .child(Element::text(format!(" {count}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_count() {
        assert_eq!(record_count(95).text_content(), "Record Count: 95");
    }

    #[test]
    fn test_page_size_menu_marks_current() {
        let menu = page_size_menu(50, &TableConfig::default());
        let items = menu.child_elements()[1].child_elements();
        assert_eq!(items.len(), 4);
        let active: Vec<_> = items
            .iter()
            .filter(|li| li.has_class("active"))
            .map(|li| li.text_content())
            .collect();
        assert_eq!(active, vec!["50"]);
    }

    #[test]
    fn test_notices_render_dismiss_buttons() {
        let mut list = Notices::new();
        let id = list.error("An unknown error occurred.");
        let el = notices(&list).unwrap();
        let alert = &el.child_elements()[0];
        assert!(alert.has_class("alert-danger"));
        let button = &alert.child_elements()[1];
        assert_eq!(
            button.handler(CLICK),
            Some(Action::DismissNotice { id }.encode().as_str())
        );
        assert!(notices(&Notices::new()).is_none());
    }
}
