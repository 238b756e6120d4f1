use crate::common::{SortOrder, SortableFields};
use crate::errors::{ErrorKind, OddishError, OddishResult};
use crate::store::memory::{lookup, matches, sort_order_of};
use bson::{Bson, Document};

/// Sorts `documents` in place by `fields`, left to right. The sort is stable,
/// so documents that compare equal keep their insertion order.
pub(crate) fn sort_documents(documents: &mut [Document], fields: &SortableFields) {
    if fields.is_empty() {
        return;
    }

    documents.sort_by(|left, right| {
        for (field_name, sort_order) in fields.sorting_order() {
            let ordering = sort_order_of(lookup(left, field_name), lookup(right, field_name));
            let ordering = match sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering.is_ne() {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    });
}

/// Runs an aggregation pipeline over `documents`.
///
/// Stages: `$match`, `$sort`, `$skip`, `$limit` and `$count`.
pub(crate) fn run_pipeline(
    mut documents: Vec<Document>,
    pipeline: &[Document],
) -> OddishResult<Vec<Document>> {
    for stage in pipeline {
        let (name, argument) = single_stage(stage)?;
        documents = match name {
            "$match" => {
                let filter = stage_document(name, argument)?;
                let mut kept = Vec::with_capacity(documents.len());
                for document in documents {
                    if matches(&document, filter)? {
                        kept.push(document);
                    }
                }
                kept
            }
            "$sort" => {
                let fields = SortableFields::from_document(stage_document(name, argument)?)?;
                sort_documents(&mut documents, &fields);
                documents
            }
            "$skip" => {
                let skip = stage_count(name, argument)?;
                documents.into_iter().skip(skip).collect()
            }
            "$limit" => {
                let limit = stage_count(name, argument)?;
                documents.truncate(limit);
                documents
            }
            "$count" => {
                let Bson::String(field) = argument else {
                    return Err(pipeline_error("$count needs a field name"));
                };
                if documents.is_empty() {
                    Vec::new()
                } else {
                    let mut counted = Document::new();
                    counted.insert(field.clone(), documents.len() as i64);
                    vec![counted]
                }
            }
            other => {
                return Err(pipeline_error(&format!("unsupported pipeline stage {}", other)));
            }
        };
    }
    Ok(documents)
}

fn single_stage(stage: &Document) -> OddishResult<(&str, &Bson)> {
    let mut entries = stage.iter();
    match (entries.next(), entries.next()) {
        (Some((name, argument)), None) => Ok((name.as_str(), argument)),
        _ => Err(pipeline_error("a pipeline stage must have exactly one field")),
    }
}

fn stage_document<'a>(name: &str, argument: &'a Bson) -> OddishResult<&'a Document> {
    match argument {
        Bson::Document(document) => Ok(document),
        _ => Err(pipeline_error(&format!("{} needs a document", name))),
    }
}

fn stage_count(name: &str, argument: &Bson) -> OddishResult<usize> {
    let count = match argument {
        Bson::Int32(v) => *v as i64,
        Bson::Int64(v) => *v,
        Bson::Double(v) if v.fract() == 0.0 => *v as i64,
        _ => return Err(pipeline_error(&format!("{} needs an integer", name))),
    };

    usize::try_from(count)
        .map_err(|_| pipeline_error(&format!("{} must not be negative", name)))
}

fn pipeline_error(message: &str) -> OddishError {
    log::error!("Invalid pipeline: {}", message);
    OddishError::new(message, ErrorKind::InvalidOperation)
}
