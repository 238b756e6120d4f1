use crate::errors::{ErrorKind, OddishError, OddishResult};
use crate::store::DocumentCursor;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;

/// Outcome of one [`SafeCursor::decode_next`] call.
#[derive(Debug, Clone)]
pub enum DecodeStep {
    /// A document was read and decoded into the destination.
    Decoded,
    /// The cursor has no more documents, or is closed.
    Exhausted,
    /// Reading or decoding failed. The destination is left untouched.
    Failed(OddishError),
}

impl DecodeStep {
    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodeStep::Decoded)
    }
}

/// A document cursor whose "advance, then decode" step is atomic.
///
/// The cursor is guarded by a mutex held for the whole of each
/// [`try_decode_next`](Self::try_decode_next) call, so threads sharing one
/// `SafeCursor` by reference each receive whole documents, never an advance
/// made by one caller decoded by another. Callers still compete for the same
/// stream: every document goes to exactly one of them.
///
/// A `SafeCursor` built from a failed query fails every decode and reports the
/// query error on [`close`](Self::close).
///
/// # Examples
///
/// ```rust,ignore
/// let cursor = SafeCursor::new(handle.find(&filter, &FindOptions::new()));
/// let mut user = User::default();
/// while cursor.try_decode_next(&mut user) {
///     println!("{}", user.name);
/// }
/// cursor.close()?;
/// ```
pub struct SafeCursor {
    inner: Mutex<SafeCursorInner>,
}

struct SafeCursorInner {
    cursor: Option<Box<dyn DocumentCursor>>,
    error: Option<OddishError>,
    open_failed: bool,
}

impl SafeCursor {
    /// Wraps the outcome of a query: either an open cursor or the error that
    /// prevented opening one.
    pub fn new(cursor: OddishResult<Box<dyn DocumentCursor>>) -> Self {
        let inner = match cursor {
            Ok(cursor) => SafeCursorInner {
                cursor: Some(cursor),
                error: None,
                open_failed: false,
            },
            Err(err) => {
                log::error!("Cursor could not be opened: {}", err);
                SafeCursorInner {
                    cursor: None,
                    error: Some(err),
                    open_failed: true,
                }
            }
        };

        SafeCursor {
            inner: Mutex::new(inner),
        }
    }

    /// Wraps an already open cursor.
    pub fn from_cursor<C: DocumentCursor + 'static>(cursor: C) -> Self {
        SafeCursor::new(Ok(Box::new(cursor)))
    }

    /// Advances to the next document and decodes it into `destination`.
    ///
    /// Returns `true` only if a document was read and decoded. Exhaustion and
    /// failure both return `false`; the failure stays available through
    /// [`error`](Self::error).
    pub fn try_decode_next<T: DeserializeOwned>(&self, destination: &mut T) -> bool {
        self.decode_next(destination).is_decoded()
    }

    /// Like [`try_decode_next`](Self::try_decode_next) but tells exhaustion
    /// and failure apart.
    pub fn decode_next<T: DeserializeOwned>(&self, destination: &mut T) -> DecodeStep {
        let mut guard = self.inner.lock();
        let SafeCursorInner {
            cursor,
            error,
            open_failed,
        } = &mut *guard;

        if *open_failed {
            return match error {
                Some(err) => DecodeStep::Failed(err.clone()),
                None => DecodeStep::Exhausted,
            };
        }

        let Some(cursor) = cursor.as_mut() else {
            return DecodeStep::Exhausted;
        };

        if !cursor.advance() {
            return match cursor.error() {
                Some(err) => {
                    log::error!("Cursor failed to advance: {}", err);
                    *error = Some(err.clone());
                    DecodeStep::Failed(err)
                }
                None => DecodeStep::Exhausted,
            };
        }

        let Some(document) = cursor.current() else {
            let err = OddishError::new(
                "cursor advanced but has no current document",
                ErrorKind::CursorError,
            );
            log::error!("{}", err);
            *error = Some(err.clone());
            return DecodeStep::Failed(err);
        };

        match bson::from_document::<T>(document.clone()) {
            Ok(value) => {
                *destination = value;
                DecodeStep::Decoded
            }
            Err(err) => {
                let err = OddishError::from(err);
                log::error!("Failed to decode document: {}", err);
                *error = Some(err.clone());
                DecodeStep::Failed(err)
            }
        }
    }

    /// The last failure seen by this cursor, if any.
    pub fn error(&self) -> Option<OddishError> {
        let guard = self.inner.lock();
        guard
            .error
            .clone()
            .or_else(|| guard.cursor.as_ref().and_then(|cursor| cursor.error()))
    }

    /// The query error, if this cursor was built from a failed query.
    pub fn open_error(&self) -> Option<OddishError> {
        let guard = self.inner.lock();
        if guard.open_failed {
            guard.error.clone()
        } else {
            None
        }
    }

    /// Closes the underlying cursor. Only the first call reaches the cursor;
    /// later calls return `Ok(())`.
    ///
    /// For a cursor that never opened, returns the query error.
    pub fn close(&self) -> OddishResult<()> {
        let mut guard = self.inner.lock();
        if guard.open_failed {
            return match &guard.error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            };
        }

        match guard.cursor.take() {
            Some(mut cursor) => cursor.close().map_err(|err| {
                log::error!("Failed to close cursor: {}", err);
                err
            }),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().cursor.is_none()
    }
}
