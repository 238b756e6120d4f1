//! Typed operations over a document collection.
//!
//! [`OddishCollection`] wraps a [`CollectionHandle`](crate::store::CollectionHandle)
//! and turns its cursors into caller-owned `Vec<T>`s.
//!
//! ```rust,ignore
//! use oddish::collection::OddishCollection;
//! use oddish::store::memory::InMemoryCollection;
//!
//! let users = OddishCollection::new(InMemoryCollection::new("users"));
//! users.insert(&User { name: "ada".into(), age: 36 })?;
//!
//! let mut found: Vec<User> = Vec::new();
//! users.find_many(&mut found, &doc! { "age": { "$gt": 30 } }, None)?;
//!
//! let pages = users.find_page(&mut found, &doc! {}, None, 2, 10)?;
//! ```
//!
//! # Document IDs
//!
//! Operations that take an id accept anything convertible to a
//! [`DocumentId`]: a 24-character hex string or an `ObjectId`. A malformed
//! string becomes the nil id, which matches no document.
//!
//! # Paging
//!
//! Pages are numbered from 1; page numbers below 1 read the first page. The
//! helpers in [`page`] do the arithmetic.

mod document_id;
mod find_options;
mod oddish_collection;
pub mod page;
mod write_result;

pub use document_id::*;
pub use find_options::*;
pub use oddish_collection::*;
pub use page::{normalize_page, skip_for, total_pages, PageRequest};
pub use write_result::*;
