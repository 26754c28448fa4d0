//! Page arithmetic.

/// Page size a freshly mounted table starts with.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Returns the last page index that still holds records.
///
/// Keeps `page * page_size < count` whenever `count > 0`. With no records
/// the only page is 0.
///
/// # Example
///
/// ```
/// use crudtable_lib::api::query::last_page;
///
/// assert_eq!(last_page(95, 20), 4);
/// assert_eq!(last_page(100, 20), 4);
/// assert_eq!(last_page(0, 20), 0);
/// ```
pub fn last_page(count: usize, page_size: usize) -> usize {
    if count == 0 || page_size == 0 {
        0
    } else {
        (count - 1) / page_size
    }
}
