//! Typed reads over document cursors.
//!
//! [`SafeCursor`] makes "advance and decode" one locked step, and
//! [`materialize`] drains a `SafeCursor` into a caller-owned `Vec<T>`,
//! reusing the elements already there before growing it. Every read
//! operation of [`OddishCollection`](crate::collection::OddishCollection)
//! goes through these two.

mod materializer;
mod safe_cursor;

pub use materializer::*;
pub use safe_cursor::*;
