//! REST operations on CRUD resources

pub mod query;
mod resource;

pub use resource::*;
