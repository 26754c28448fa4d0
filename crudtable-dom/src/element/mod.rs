mod content;
mod node;

pub use content::Content;
pub use node::{Element, Handler};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id.as_deref() == Some(id) {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Collect every element in the tree (depth-first, pre-order) matching `pred`.
pub fn find_all<'a>(root: &'a Element, pred: impl Fn(&Element) -> bool) -> Vec<&'a Element> {
    fn walk<'a>(el: &'a Element, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(el) {
            out.push(el);
        }
        if let Content::Children(children) = &el.content {
            for child in children {
                walk(child, pred, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(root, &pred, &mut out);
    out
}

/// Visit every element in the tree mutably (depth-first, pre-order).
pub fn visit_mut(root: &mut Element, f: &mut dyn FnMut(&mut Element)) {
    f(root);
    if let Content::Children(children) = &mut root.content {
        for child in children {
            visit_mut(child, f);
        }
    }
}
