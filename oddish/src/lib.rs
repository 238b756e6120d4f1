//! # Oddish - typed data access for document collections
//!
//! Oddish sits between application code and a document database collection.
//! It takes care of the parts every data-access layer repeats: walking a
//! cursor, decoding each document into a typed value, normalizing document
//! ids and working out pages.
//!
//! ## Key Features
//!
//! - **Typed reads**: results land in a caller-owned `Vec<T>` for any
//!   `T: DeserializeOwned + Default`; the vector's existing elements are
//!   reused before it grows
//! - **Safe cursors**: advancing and decoding is one locked step, so a
//!   cursor shared between threads hands out whole documents
//! - **Flexible ids**: hex strings and `ObjectId`s are accepted wherever an
//!   id is
//! - **Paging**: 1-based pages with a live total page count
//! - **Pluggable backends**: anything implementing
//!   [`CollectionHandle`](store::CollectionHandle); an in-memory backend is
//!   included
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bson::doc;
//! use oddish::collection::OddishCollection;
//! use oddish::common::SortableFields;
//! use oddish::store::memory::InMemoryCollection;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! let users = OddishCollection::new(InMemoryCollection::new("users"));
//! let inserted = users.insert(&User { name: "ada".into(), age: 36 })?;
//!
//! let mut found: Vec<User> = Vec::new();
//! let sort = SortableFields::new().add_field("name");
//! users.find_many(&mut found, &doc! { "age": { "$gte": 18 } }, Some(&sort))?;
//!
//! let total_pages = users.find_page(&mut found, &doc! {}, Some(&sort), 1, 10)?;
//! ```
//!
//! ## Modules
//!
//! - [`collection`]: `OddishCollection`, ids, find options, paging
//! - [`cursor`]: `SafeCursor` and the `materialize` routine
//! - [`store`]: the backend traits and the in-memory backend
//! - [`oddish_config`]: per-collection settings
//! - [`errors`]: `OddishError`, `ErrorKind` and `OddishResult`
//! - [`common`]: sort orders and shared constants

pub mod collection;
pub mod common;
pub mod cursor;
pub mod errors;
pub mod oddish_config;
pub mod store;
