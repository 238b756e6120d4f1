use crate::errors::{OddishError, OddishResult};
use bson::Document;

/// A forward-only cursor over the documents of one query.
///
/// This is the cursor protocol expected from a database client: advance,
/// look at the current document, close. Decoding the current document into a
/// typed value is done by [`SafeCursor`](crate::cursor::SafeCursor), not by
/// the cursor itself.
///
/// A failure while advancing is not returned from [`advance`](Self::advance);
/// the cursor reports `false` and keeps the failure available through
/// [`error`](Self::error), in the same way a server cursor does when a
/// `getMore` fails.
pub trait DocumentCursor: Send {
    /// Moves to the next document. Returns `true` if a document is available.
    fn advance(&mut self) -> bool;

    /// The document the cursor is positioned on, if any.
    fn current(&self) -> Option<&Document>;

    /// The failure that stopped the last [`advance`](Self::advance), if any.
    fn error(&self) -> Option<OddishError>;

    /// Releases the cursor. After closing, `advance` returns `false`.
    fn close(&mut self) -> OddishResult<()>;
}
