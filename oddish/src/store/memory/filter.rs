use crate::errors::{ErrorKind, OddishError, OddishResult};
use bson::{Bson, Document};
use std::cmp::Ordering;

const FIELD_SEPARATOR: char = '.';

/// Evaluates a query document against `document`.
///
/// Supported: field equality, `$eq` `$ne` `$gt` `$gte` `$lt` `$lte` `$in`
/// `$nin` `$exists` on fields, `$and` `$or` `$nor` at the top level and dotted
/// paths into embedded documents. An equality test against an array field
/// matches if any element is equal.
pub(crate) fn matches(document: &Document, filter: &Document) -> OddishResult<bool> {
    for (key, condition) in filter {
        let matched = match key.as_str() {
            "$and" => {
                let mut all = true;
                for clause in clauses(key, condition)? {
                    if !matches(document, clause)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => any_clause(document, key, condition)?,
            "$nor" => !any_clause(document, key, condition)?,
            op if op.starts_with('$') => {
                return Err(filter_error(&format!("unsupported top-level operator {}", op)))
            }
            field => field_matches(lookup(document, field), condition)?,
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Resolves a dotted path such as `address.city`.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split(FIELD_SEPARATOR);
    let first = segments.next()?;
    let mut value = document.get(first)?;
    for segment in segments {
        value = match value {
            Bson::Document(embedded) => embedded.get(segment)?,
            _ => return None,
        };
    }
    Some(value)
}

/// Orders two values of comparable types. Numbers compare across their
/// widths: integer pairs exactly as `i64`, pairs involving a double as `f64`.
/// Mixed or unordered types return `None`.
pub(crate) fn compare_values(left: &Bson, right: &Bson) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (as_i64(left), as_i64(right)) {
        return Some(l.cmp(&r));
    }
    if let (Some(l), Some(r)) = (as_f64(left), as_f64(right)) {
        return l.partial_cmp(&r);
    }

    match (left, right) {
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        (Bson::String(l), Bson::String(r)) => Some(l.cmp(r)),
        (Bson::Boolean(l), Bson::Boolean(r)) => Some(l.cmp(r)),
        (Bson::ObjectId(l), Bson::ObjectId(r)) => Some(l.cmp(r)),
        (Bson::DateTime(l), Bson::DateTime(r)) => Some(l.cmp(r)),
        (Bson::Timestamp(l), Bson::Timestamp(r)) => {
            Some((l.time, l.increment).cmp(&(r.time, r.increment)))
        }
        _ => None,
    }
}

/// Total order used for sorting: values are ranked by type first (missing
/// and null lowest), then by value within a type.
pub(crate) fn sort_order_of(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    let left = left.unwrap_or(&Bson::Null);
    let right = right.unwrap_or(&Bson::Null);

    type_rank(left)
        .cmp(&type_rank(right))
        .then_with(|| compare_values(left, right).unwrap_or(Ordering::Equal))
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Null | Bson::Undefined => 0,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 1,
        Bson::String(_) | Bson::Symbol(_) => 2,
        Bson::Document(_) => 3,
        Bson::Array(_) => 4,
        Bson::Binary(_) => 5,
        Bson::ObjectId(_) => 6,
        Bson::Boolean(_) => 7,
        Bson::DateTime(_) => 8,
        Bson::Timestamp(_) => 9,
        _ => 10,
    }
}

fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(*v as i64),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn values_equal(left: &Bson, right: &Bson) -> bool {
    match compare_values(left, right) {
        Some(ordering) => ordering == Ordering::Equal,
        None => left == right,
    }
}

fn field_matches(value: Option<&Bson>, condition: &Bson) -> OddishResult<bool> {
    match condition {
        Bson::Document(operators) if is_operator_document(operators) => {
            for (operator, operand) in operators {
                if !apply_operator(value, operator, operand)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(equals(value, condition)),
    }
}

fn is_operator_document(document: &Document) -> bool {
    document
        .keys()
        .next()
        .map(|key| key.starts_with('$'))
        .unwrap_or(false)
}

fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, expected))
        }
        Some(actual) => values_equal(actual, expected),
    }
}

fn compares(value: Option<&Bson>, operand: &Bson, accept: fn(Ordering) -> bool) -> bool {
    match value {
        Some(Bson::Array(items)) => items
            .iter()
            .any(|item| compare_values(item, operand).map(accept).unwrap_or(false)),
        Some(actual) => compare_values(actual, operand).map(accept).unwrap_or(false),
        None => false,
    }
}

fn apply_operator(value: Option<&Bson>, operator: &str, operand: &Bson) -> OddishResult<bool> {
    let matched = match operator {
        "$eq" => equals(value, operand),
        "$ne" => !equals(value, operand),
        "$gt" => compares(value, operand, |o| o == Ordering::Greater),
        "$gte" => compares(value, operand, |o| o != Ordering::Less),
        "$lt" => compares(value, operand, |o| o == Ordering::Less),
        "$lte" => compares(value, operand, |o| o != Ordering::Greater),
        "$in" => in_list(value, operator, operand)?,
        "$nin" => !in_list(value, operator, operand)?,
        "$exists" => match operand {
            Bson::Boolean(expected) => value.is_some() == *expected,
            _ => return Err(filter_error("$exists needs a boolean")),
        },
        _ => return Err(filter_error(&format!("unsupported operator {}", operator))),
    };
    Ok(matched)
}

fn in_list(value: Option<&Bson>, operator: &str, operand: &Bson) -> OddishResult<bool> {
    match operand {
        Bson::Array(candidates) => Ok(candidates.iter().any(|candidate| equals(value, candidate))),
        _ => Err(filter_error(&format!("{} needs an array", operator))),
    }
}

fn clauses<'a>(operator: &str, condition: &'a Bson) -> OddishResult<Vec<&'a Document>> {
    let Bson::Array(items) = condition else {
        return Err(filter_error(&format!("{} needs an array", operator)));
    };

    items
        .iter()
        .map(|item| match item {
            Bson::Document(clause) => Ok(clause),
            _ => Err(filter_error(&format!("{} entries must be documents", operator))),
        })
        .collect()
}

fn any_clause(document: &Document, operator: &str, condition: &Bson) -> OddishResult<bool> {
    for clause in clauses(operator, condition)? {
        if matches(document, clause)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn filter_error(message: &str) -> OddishError {
    log::error!("Invalid filter: {}", message);
    OddishError::new(message, ErrorKind::FilterError)
}
