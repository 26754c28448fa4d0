//! Add form, show dialog and delete confirmation.

use crudtable_dom::Content;
use crudtable_dom::Element;

use super::on_click;
use crate::action::Action;
use crate::action::CHANGE;
use crate::action::INPUT;
use crate::field::ADD_PREFIX;
use crate::field::FieldDescriptor;
use crate::field::FieldInput;
use crate::state::AddForm;
use crate::state::TableState;

pub const DELETE_CONFIRM_TEXT: &str = "You sure you want to delete this item?";

fn heading(text: impl Into<String>) -> Element {
    Element::new("h4").content(Content::Text(text.into()))
}

fn modal(class: &str) -> Element {
    Element::div().class("modal").class(class).attr("role", "dialog")
}

pub(super) fn show_dialog(state: &TableState) -> Option<Element> {
    let item = state.shown.as_ref()?;

    let rows = item.columns().into_iter().map(|column| {
        Element::tr()
            .child(Element::th().child(Element::text(item.label(&column))))
            .child(Element::td().child(Element::text(item.result.display(&column))))
    });

    Some(
        modal("crud-show")
            .child(heading(item.show_title.clone()))
            .child(Element::table().class("table").child(Element::tbody().children(rows)))
            .child(on_click(Element::button("Close").class("btn btn-default"), Action::CloseShow)),
    )
}

pub(super) fn delete_confirm(state: &TableState) -> Option<Element> {
    let id = state.pending_delete.as_ref()?;

    Some(
        modal("crud-confirm")
            .data("id", id.to_string())
            .child(Element::new("p").content(Content::Text(DELETE_CONFIRM_TEXT.into())))
            .child(on_click(Element::button("OK").class("btn btn-danger"), Action::ConfirmDelete))
            .child(on_click(Element::button("Cancel").class("btn btn-default"), Action::CancelDelete)),
    )
}

pub(super) fn add_form(state: &TableState) -> Option<Element> {
    let form = state.add_form.as_ref()?;

    Some(
        Element::form()
            .class("crud-add")
            .child(heading(form.title.clone()))
            .children(form.fields.iter().map(|field| form_group(form, field)))
            .child(on_click(Element::button("Save").class("btn btn-primary"), Action::SubmitAdd))
            .child(on_click(Element::button("Cancel").class("btn btn-default"), Action::CloseAdd)),
    )
}

fn form_group(form: &AddForm, field: &FieldDescriptor) -> Element {
    let id = field.input_id(ADD_PREFIX);
    let value = form.value(&field.name);
    let errors = form.errors_for(&field.name);
    let action = Action::ChangeField {
        field: field.name.clone(),
    }
    .encode();

    let label = if field.required {
        Element::new("label")
            .class("required")
            .child(Element::text(field.label.clone()))
            .child(Element::strong(" *"))
    } else {
        Element::label(field.label.clone())
    }
    .attr("for", id.clone());

    let input = match &field.input {
        FieldInput::Select(values) => Element::select()
            .id(id)
            .class("form-control crud-select")
            .data("searchable", "true")
            .required(field.required)
            .on(CHANGE, action)
            .child(Element::option("", ""))
            .children(values.iter().map(|v| {
                let key = v.id.to_string();
                let selected = key == value;
                Element::option(key, v.value.clone()).selected(selected)
            })),
        FieldInput::Text => field.mask.attach(
            Element::text_input(value)
                .id(id)
                .class("form-control")
                .required(field.required)
                .on(INPUT, action),
        ),
    };

    let mut group = Element::div()
        .class("form-group")
        .data("field", field.name.clone())
        .child(label)
        .child(input);
    if !field.description.is_empty() {
        group = group.child(help_block(&field.description));
    }
    if !errors.is_empty() {
        group = group.class("has-error");
        for message in errors {
            group = group.child(help_block(message).class("crud-error"));
        }
    }
    group
}

fn help_block(text: &str) -> Element {
    Element::span()
        .class("help-block")
        .content(Content::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use crudtable_lib::model::ColumnInfo;
    use crudtable_lib::model::Item;
    use crudtable_lib::model::ItemId;
    use crudtable_lib::model::RelatedValue;
    use crudtable_lib::model::Row;
    use serde_json::json;

    use super::*;
    use crate::config::LocaleConfig;
    use crate::config::TableConfig;
    use crate::mask::MaskRegistry;

    fn descriptor(column: ColumnInfo) -> FieldDescriptor {
        FieldDescriptor::from_column(
            &column,
            &TableConfig::default(),
            &LocaleConfig::default(),
            &MaskRegistry::default(),
        )
    }

    #[test]
    fn test_required_marker_and_errors() {
        let name = ColumnInfo::new("name", "Name", "String").required();
        let mut form = AddForm::new("Add Contact", vec![descriptor(name)]);
        form.add_error("name", "This field is required.");
        let group = form_group(&form, &form.fields[0]);

        assert!(group.has_class("has-error"));
        let label = &group.child_elements()[0];
        assert!(label.has_class("required"));
        assert_eq!(label.text_content(), "Name *");
        assert!(group.child_elements()[1].required);
        assert_eq!(group.child_elements()[2].text_content(), "This field is required.");
    }

    #[test]
    fn test_related_field_is_searchable_select() {
        let column = ColumnInfo::new("contact_group", "Group", "Related").with_values(vec![
            RelatedValue {
                id: ItemId::Int(1),
                value: "Friends".into(),
            },
            RelatedValue {
                id: ItemId::Int(2),
                value: "Work".into(),
            },
        ]);
        let mut form = AddForm::new("Add", vec![descriptor(column)]);
        form.values.insert("contact_group".into(), "2".into());

        let group = form_group(&form, &form.fields[0]);
        let select = &group.child_elements()[1];
        assert_eq!(select.tag, "select");
        assert_eq!(select.get_data("searchable"), Some("true"));
        let options = select.child_elements();
        assert_eq!(options.len(), 3);
        assert!(options[2].selected);
        assert_eq!(options[2].text_content(), "Work");
    }

    #[test]
    fn test_masked_input_is_annotated() {
        let salary = ColumnInfo::new("salary", "Salary", "Decimal");
        let form = AddForm::new("Add", vec![descriptor(salary)]);
        let group = form_group(&form, &form.fields[0]);
        let input = &group.child_elements()[1];
        assert!(input.has_class("crud-decimal"));
        assert_eq!(input.id.as_deref(), Some("add-salary"));
    }

    #[test]
    fn test_show_dialog() {
        let mut state = TableState::default();
        assert!(show_dialog(&state).is_none());

        state.shown = Some(Item {
            id: Some(ItemId::Int(1)),
            show_title: "Show Contact".into(),
            label_columns: [("name".to_string(), "Name".to_string())].into(),
            show_columns: vec!["name".into()],
            result: Row::flatten(&json!({"name": "Ada"})),
        });
        let dialog = show_dialog(&state).unwrap();
        assert_eq!(dialog.text_content(), "Show ContactNameAdaClose");
    }

    #[test]
    fn test_delete_confirm() {
        let mut state = TableState::default();
        assert!(delete_confirm(&state).is_none());
        state.pending_delete = Some(ItemId::Int(4));
        let dialog = delete_confirm(&state).unwrap();
        assert_eq!(dialog.get_data("id"), Some("4"));
        assert!(dialog.text_content().starts_with(DELETE_CONFIRM_TEXT));
    }
}
