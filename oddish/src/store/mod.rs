//! The database client boundary and the in-memory backend.
//!
//! [`CollectionHandle`] and [`DocumentCursor`] describe what the data-access
//! layer needs from a document database client. [`memory`] provides an
//! implementation that keeps documents in process, which is what the tests and
//! embedded users run against.

mod collection_handle;
mod document_cursor;
pub mod memory;

pub use collection_handle::*;
pub use document_cursor::*;
