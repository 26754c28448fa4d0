//! CRUD resource API client library
//!
//! A Rust async client for the REST API exposed by admin-panel generated
//! CRUD resources (`/api/{version}/{resource}`).

pub mod api;
pub mod error;
pub mod model;
pub mod rison;

mod client;

pub use client::*;
