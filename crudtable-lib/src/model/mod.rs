//! Data model for resource metadata, listings and items.

mod info;
mod item;
mod result;

pub use info::*;
pub use item::*;
pub use result::*;
