//! Query state and its wire encoding.
//!
//! # Types
//!
//! - [`Filter`] - one `(col, opr, value)` condition
//! - [`OrderBy`] / [`Direction`] - sort column and direction
//! - [`QueryState`] - everything that decides which rows a list call returns
//!
//! A [`QueryState`] travels as a single rison-encoded `q` parameter, see
//! [`QueryState::to_query_param`].

mod filter;
mod order;
mod page;
mod state;

pub use filter::Filter;
pub use order::Direction;
pub use order::OrderBy;
pub use page::DEFAULT_PAGE_SIZE;
pub use page::last_page;
pub use state::QueryState;
