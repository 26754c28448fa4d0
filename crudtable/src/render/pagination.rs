//! Pagination control.

use std::ops::RangeInclusive;

use crudtable_dom::Element;

use super::on_click;
use crate::action::Action;
use crate::config::TableConfig;
use crate::state::TableState;

/// Page numbers shown around `page`.
///
/// At most `size` pages, centered on `page` where possible and never
/// leaving `[0, last]`.
///
/// # Example
///
/// ```
/// use crudtable::render::page_window;
///
/// assert_eq!(page_window(0, 4, 10), 0..=4);
/// assert_eq!(page_window(12, 30, 10), 7..=16);
/// assert_eq!(page_window(29, 30, 10), 21..=30);
/// ```
pub fn page_window(page: usize, last: usize, size: usize) -> RangeInclusive<usize> {
    let size = size.max(1);
    let total = last + 1;
    if total <= size {
        return 0..=last;
    }

    let start = page.saturating_sub(size / 2).min(total - size);
    start..=start + size - 1
}

pub(super) fn pagination(state: &TableState, config: &TableConfig) -> Option<Element> {
    let page_size = state.query.page_size();
    if state.result.count <= page_size {
        return None;
    }

    let page = state.query.page();
    let last = state.last_page();

    let control = |label: &str, target: i64, enabled: bool| {
        let link = Element::link(label);
        if enabled {
            Element::li().child(on_click(link, Action::ChangePage { page: target }))
        } else {
            Element::li().class("disabled").child(link)
        }
    };

    let numbers = page_window(page, last, config.pagination_window).map(|n| {
        let item = Element::li().child(on_click(
            Element::link((n + 1).to_string()),
            Action::ChangePage { page: n as i64 },
        ));
        if n == page { item.class("active") } else { item }
    });

    Some(
        Element::ul()
            .class("pagination")
            .child(control("\u{ab}", 0, page > 0))
            .child(control("\u{2039}", page as i64 - 1, page > 0))
            .children(numbers)
            .child(control("\u{203a}", page as i64 + 1, page < last))
            .child(control("\u{bb}", last as i64, page < last)),
    )
}
