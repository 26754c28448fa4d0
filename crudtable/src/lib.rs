//! CRUD table component: a state container, pure render functions and a
//! masked-field adapter on top of [`crudtable_lib`].
//!
//! # Flow
//!
//! A user action reaches [`TableController::handle`] (or one of the
//! synchronous mutators), the query state changes, a fetch is scheduled,
//! and its outcome is merged back with [`TableController::apply`]. The view
//! is rebuilt from state with [`TableController::render`].
//!
//! ```ignore
//! let client = CrudClient::builder().url("http://localhost:8080").build()?;
//! let mut table = TableController::new(Arc::new(client), "contacts");
//! table.load().await;
//!
//! if let Some(fetch) = table.toggle_order("name") {
//!     let outcome = fetch.send().await;
//!     table.apply(outcome);
//! }
//! println!("{}", crudtable_dom::to_html(&table.render()));
//! ```

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod mask;
pub mod notice;
pub mod render;
pub mod state;

pub use action::{Action, Handled};
pub use config::{LocaleConfig, TableConfig};
pub use controller::{Applied, FetchOutcome, InfoOutcome, PendingFetch, PendingInfo, TableController};
pub use error::TableError;
pub use field::{FieldDescriptor, FieldInput};
pub use mask::{FieldKind, FieldMask, MaskAdapter, MaskRegistry, MaskStrategy};
pub use notice::{Notice, NoticeLevel, Notices};
pub use state::{AddForm, TableState};
