use crudtable_dom::{find_all, find_element, to_html, visit_mut, Content, Element};

fn sample() -> Element {
    Element::table()
        .id("contacts")
        .class("table table-hover")
        .child(
            Element::thead().child(
                Element::tr()
                    .child(Element::th().child(Element::link("Name").on("click", "sort:name")))
                    .child(Element::th().child(Element::text("Group"))),
            ),
        )
        .child(
            Element::tbody().child(
                Element::tr()
                    .data("id", "1")
                    .child(Element::td().content(Content::Text("Ada & Co".into())))
                    .child(Element::td().content(Content::Text("<Friends>".into()))),
            ),
        )
}

// ============================================================================
// Serialization Tests
// ============================================================================

#[test]
fn test_serializes_nested_tree() {
    let html = to_html(&sample());
    assert_eq!(
        html,
        "<table id=\"contacts\" class=\"table table-hover\">\
         <thead><tr>\
         <th><a href=\"#\" data-on-click=\"sort:name\">Name</a></th>\
         <th><span>Group</span></th>\
         </tr></thead>\
         <tbody><tr data-id=\"1\">\
         <td>Ada &amp; Co</td><td>&lt;Friends&gt;</td>\
         </tr></tbody></table>"
    );
}

#[test]
fn test_boolean_state_attributes() {
    let select = Element::select()
        .required(true)
        .child(Element::option("sw", "Starts with").selected(true))
        .child(Element::option("ew", "Ends with"));
    assert_eq!(
        to_html(&select),
        "<select required>\
         <option value=\"sw\" selected>Starts with</option>\
         <option value=\"ew\">Ends with</option>\
         </select>"
    );

    let button = Element::button("Delete").disabled(true);
    assert_eq!(
        to_html(&button),
        "<button type=\"button\" disabled>Delete</button>"
    );
}

#[test]
fn test_attribute_values_are_escaped() {
    let input = Element::text_input("say \"hi\"");
    assert_eq!(
        to_html(&input),
        "<input type=\"text\" value=\"say &quot;hi&quot;\">"
    );
}

// ============================================================================
// Tree Query Tests
// ============================================================================

#[test]
fn test_find_element_by_id() {
    let root = sample();
    let found = find_element(&root, "contacts").unwrap();
    assert_eq!(found.tag, "table");
    assert!(find_element(&root, "missing").is_none());
}

#[test]
fn test_find_all_in_document_order() {
    let root = sample();
    let cells = find_all(&root, |el| el.tag == "td");
    let texts: Vec<_> = cells.iter().map(|el| el.text_content()).collect();
    assert_eq!(texts, vec!["Ada & Co", "<Friends>"]);
}

#[test]
fn test_visit_mut_decorates_tree() {
    let mut root = sample();
    visit_mut(&mut root, &mut |el| {
        if el.tag == "td" {
            el.add_class("cell");
        }
    });
    assert_eq!(find_all(&root, |el| el.has_class("cell")).len(), 2);
}
