use crate::errors::{OddishError, OddishResult};
use crate::store::DocumentCursor;
use bson::Document;
use std::collections::VecDeque;

/// A cursor over a snapshot of documents.
///
/// Writes made to the collection after the cursor was opened are not seen.
pub struct InMemoryCursor {
    documents: VecDeque<Document>,
    current: Option<Document>,
    closed: bool,
}

impl InMemoryCursor {
    pub fn new(documents: Vec<Document>) -> Self {
        InMemoryCursor {
            documents: documents.into(),
            current: None,
            closed: false,
        }
    }

    /// Number of documents not yet advanced to.
    pub fn remaining(&self) -> usize {
        self.documents.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DocumentCursor for InMemoryCursor {
    fn advance(&mut self) -> bool {
        if self.closed {
            self.current = None;
            return false;
        }
        self.current = self.documents.pop_front();
        self.current.is_some()
    }

    fn current(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    fn error(&self) -> Option<OddishError> {
        None
    }

    fn close(&mut self) -> OddishResult<()> {
        self.closed = true;
        self.documents.clear();
        self.current = None;
        Ok(())
    }
}
