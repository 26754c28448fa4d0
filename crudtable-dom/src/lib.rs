pub mod element;
pub mod html;

pub use element::{find_all, find_element, visit_mut, Content, Element, Handler};
pub use html::to_html;
