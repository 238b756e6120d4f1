use crate::common::{SORT_ASCENDING, SORT_DESCENDING};
use crate::errors::{ErrorKind, OddishError, OddishResult};
use bson::{Bson, Document};

/// Specifies the direction for sorting documents.
///
/// # Usage
/// ```text
/// let options = order_by("age", SortOrder::Descending);
/// let cursor = handle.find(&filter, &options)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z, oldest to newest)
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A, newest to oldest)
    Descending,
}

impl SortOrder {
    /// The numeric direction used inside a sort document.
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Ascending => SORT_ASCENDING,
            SortOrder::Descending => SORT_DESCENDING,
        }
    }
}

/// An ordered list of `(field, order)` pairs.
///
/// Converts to and from the sort document understood by the database
/// client, e.g. `{ "age": -1, "name": 1 }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortableFields {
    sorting_order: Vec<(String, SortOrder)>,
}

impl SortableFields {
    pub fn new() -> SortableFields {
        SortableFields {
            sorting_order: Vec::new(),
        }
    }

    #[inline]
    pub fn add_field(self, field_name: &str) -> SortableFields {
        self.add_sorted_field(field_name, SortOrder::Ascending)
    }

    #[inline]
    pub fn add_sorted_field(mut self, field_name: &str, sort_order: SortOrder) -> SortableFields {
        self.sorting_order.push((field_name.to_string(), sort_order));
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.sorting_order
            .iter()
            .map(|(field_name, _)| field_name.clone())
            .collect()
    }

    #[inline]
    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    pub fn is_empty(&self) -> bool {
        self.sorting_order.is_empty()
    }

    /// Builds the sort document, preserving field order.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        for (field_name, sort_order) in &self.sorting_order {
            document.insert(field_name.clone(), sort_order.direction());
        }
        document
    }

    /// Parses a sort document such as the argument of a `$sort` stage.
    ///
    /// Every value must be a numeric `1` or `-1`.
    pub fn from_document(document: &Document) -> OddishResult<SortableFields> {
        let mut fields = SortableFields::new();
        for (field_name, direction) in document {
            let direction = match direction {
                Bson::Int32(v) => *v as i64,
                Bson::Int64(v) => *v,
                Bson::Double(v) if v.fract() == 0.0 => *v as i64,
                other => {
                    log::error!("Invalid sort direction for field {}: {:?}", field_name, other);
                    return Err(OddishError::new(
                        &format!("invalid sort direction for field {}", field_name),
                        ErrorKind::InvalidOperation,
                    ));
                }
            };

            let sort_order = match direction {
                1 => SortOrder::Ascending,
                -1 => SortOrder::Descending,
                _ => {
                    log::error!("Sort direction must be 1 or -1, got {}", direction);
                    return Err(OddishError::new(
                        &format!("sort direction for field {} must be 1 or -1", field_name),
                        ErrorKind::InvalidOperation,
                    ));
                }
            };
            fields = fields.add_sorted_field(field_name, sort_order);
        }
        Ok(fields)
    }
}
