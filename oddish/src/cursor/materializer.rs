use crate::cursor::{DecodeStep, SafeCursor};
use crate::errors::{OddishError, OddishResult};
use serde::de::DeserializeOwned;

/// Decodes every remaining document of `cursor` into `destination`.
///
/// Existing elements of `destination` are overwritten in order before new
/// ones are appended, and any elements left over past the last decoded
/// document are dropped, so on return `destination.len()` is the number of
/// documents read. The cursor is closed in every case.
///
/// A document that fails to decode ends the read exactly as running out of
/// documents would; the elements decoded before it are kept and the call
/// still succeeds. Use [`materialize_strict`] to get that failure back.
///
/// # Errors
///
/// If the query behind `cursor` failed, returns that error and leaves
/// `destination` untouched. Otherwise returns the cursor close error, if
/// closing fails; `destination` has been filled by then.
///
/// # Examples
///
/// ```rust,ignore
/// let mut users: Vec<User> = Vec::new();
/// let cursor = SafeCursor::new(handle.find(&doc! { "active": true }, &FindOptions::new()));
/// let count = materialize(cursor, &mut users)?;
/// assert_eq!(count, users.len());
/// ```
pub fn materialize<T>(cursor: SafeCursor, destination: &mut Vec<T>) -> OddishResult<usize>
where
    T: DeserializeOwned + Default,
{
    if let Some(err) = cursor.open_error() {
        return Err(err);
    }

    let (written, _) = fill(&cursor, destination);
    cursor.close()?;
    Ok(written)
}

/// Like [`materialize`], but a read or decode failure that ended the read is
/// returned as the error, after `destination` is truncated and the cursor is
/// closed.
pub fn materialize_strict<T>(cursor: SafeCursor, destination: &mut Vec<T>) -> OddishResult<usize>
where
    T: DeserializeOwned + Default,
{
    if let Some(err) = cursor.open_error() {
        return Err(err);
    }

    let (written, failure) = fill(&cursor, destination);
    let closed = cursor.close();

    if let Some(err) = failure {
        if let Err(close_err) = closed {
            log::error!("Cursor close failed after a read failure: {}", close_err);
        }
        return Err(err);
    }

    closed?;
    Ok(written)
}

fn fill<T>(cursor: &SafeCursor, destination: &mut Vec<T>) -> (usize, Option<OddishError>)
where
    T: DeserializeOwned + Default,
{
    let mut written = 0;
    let failure = loop {
        let step = if written == destination.len() {
            let mut element = T::default();
            let step = cursor.decode_next(&mut element);
            if step.is_decoded() {
                destination.push(element);
            }
            step
        } else {
            cursor.decode_next(&mut destination[written])
        };

        match step {
            DecodeStep::Decoded => written += 1,
            DecodeStep::Exhausted => break None,
            DecodeStep::Failed(err) => break Some(err),
        }
    };

    destination.truncate(written);
    (written, failure)
}
