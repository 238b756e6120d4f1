use crate::common::DOC_ID;
use crate::errors::{ErrorKind, OddishError, OddishResult};
use bson::{Bson, Document};

/// Applies an update document made of `$set`, `$unset` and `$inc` operators.
///
/// Returns whether the document changed. Dotted paths reach into embedded
/// documents; `$set` creates the missing levels. Changing `_id` is rejected.
pub(crate) fn apply_update(document: &mut Document, update: &Document) -> OddishResult<bool> {
    if update.is_empty() {
        return Err(update_error("update document is empty"));
    }

    let mut updated = document.clone();
    for (operator, fields) in update {
        let Bson::Document(fields) = fields else {
            return Err(update_error(&format!(
                "{} needs a document of fields",
                operator
            )));
        };

        for (path, value) in fields {
            match operator.as_str() {
                "$set" => set_path(&mut updated, path, value.clone())?,
                "$unset" => unset_path(&mut updated, path),
                "$inc" => increment_path(&mut updated, path, value)?,
                other if other.starts_with('$') => {
                    return Err(update_error(&format!("unsupported update operator {}", other)))
                }
                _ => {
                    return Err(update_error(
                        "update document must only contain update operators",
                    ))
                }
            }
        }
    }

    if updated.get(DOC_ID) != document.get(DOC_ID) {
        return Err(update_error("the _id field cannot be changed"));
    }

    let modified = updated != *document;
    *document = updated;
    Ok(modified)
}

fn set_path(document: &mut Document, path: &str, value: Bson) -> OddishResult<()> {
    match path.split_once('.') {
        None => {
            document.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            let child = document
                .entry(head.to_string())
                .or_insert_with(|| Bson::Document(Document::new()));
            match child {
                Bson::Document(embedded) => set_path(embedded, rest, value),
                _ => Err(update_error(&format!(
                    "cannot set {} inside a non-document field",
                    path
                ))),
            }
        }
    }
}

fn unset_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            document.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(embedded)) = document.get_mut(head) {
                unset_path(embedded, rest);
            }
        }
    }
}

fn increment_path(document: &mut Document, path: &str, by: &Bson) -> OddishResult<()> {
    let current = crate::store::memory::lookup(document, path)
        .cloned()
        .unwrap_or(Bson::Int32(0));

    let next = match (&current, by) {
        (Bson::Int32(a), Bson::Int32(b)) => match a.checked_add(*b) {
            Some(sum) => Bson::Int32(sum),
            None => Bson::Int64(*a as i64 + *b as i64),
        },
        (Bson::Int32(a), Bson::Int64(b)) => Bson::Int64(checked_sum(path, *a as i64, *b)?),
        (Bson::Int64(a), Bson::Int32(b)) => Bson::Int64(checked_sum(path, *a, *b as i64)?),
        (Bson::Int64(a), Bson::Int64(b)) => Bson::Int64(checked_sum(path, *a, *b)?),
        (Bson::Double(a), Bson::Double(b)) => Bson::Double(a + b),
        (Bson::Double(a), Bson::Int32(b)) => Bson::Double(a + *b as f64),
        (Bson::Double(a), Bson::Int64(b)) => Bson::Double(a + *b as f64),
        (Bson::Int32(a), Bson::Double(b)) => Bson::Double(*a as f64 + b),
        (Bson::Int64(a), Bson::Double(b)) => Bson::Double(*a as f64 + b),
        _ => {
            return Err(update_error(&format!(
                "$inc needs numeric values for field {}",
                path
            )))
        }
    };
    set_path(document, path, next)
}

fn checked_sum(path: &str, current: i64, by: i64) -> OddishResult<i64> {
    current
        .checked_add(by)
        .ok_or_else(|| update_error(&format!("$inc overflowed field {}", path)))
}

fn update_error(message: &str) -> OddishError {
    log::error!("Invalid update: {}", message);
    OddishError::new(message, ErrorKind::InvalidOperation)
}
