//! An in-process [`CollectionHandle`](crate::store::CollectionHandle).
//!
//! Documents live in a `Vec` behind a read-write lock. The filter and
//! pipeline languages understood here are a small subset of the usual
//! document-database ones; anything outside it is rejected with an error
//! rather than silently ignored.

mod collection;
mod cursor;
mod filter;
mod pipeline;
mod update;

pub use collection::*;
pub use cursor::*;
pub(crate) use filter::*;
pub(crate) use pipeline::*;
pub(crate) use update::*;
