use crate::errors::{ErrorKind, OddishError, OddishResult};
use bson::oid::ObjectId;
use bson::Bson;
use once_cell::sync::Lazy;
use std::fmt::{Display, Formatter};

static NIL_OBJECT_ID: Lazy<ObjectId> = Lazy::new(|| ObjectId::from_bytes([0u8; 12]));

/// The reserved identifier that malformed id strings map to.
///
/// It is twelve zero bytes, which no generated `ObjectId` can be, so a lookup
/// by it finds nothing.
pub fn nil_object_id() -> ObjectId {
    *NIL_OBJECT_ID
}

/// Returns `true` if `id` is the nil identifier.
pub fn is_nil(id: &ObjectId) -> bool {
    *id == *NIL_OBJECT_ID
}

/// Parses a 24-character hex string, falling back to the nil identifier.
///
/// # Examples
///
/// ```rust,ignore
/// let id = object_id_from_hex("65f1c0ffee0ddba11c0ffee0");
/// assert!(!is_nil(&id));
/// assert!(is_nil(&object_id_from_hex("not-an-id")));
/// ```
pub fn object_id_from_hex(hex: &str) -> ObjectId {
    match ObjectId::parse_str(hex) {
        Ok(id) => id,
        Err(err) => {
            log::debug!("Invalid object id {:?}, using nil id: {}", hex, err);
            nil_object_id()
        }
    }
}

/// Normalizes a dynamically typed identifier to an `ObjectId`.
///
/// A `Bson::ObjectId` passes through, a `Bson::String` is parsed with
/// [`object_id_from_hex`], and any other type returns `None`.
pub fn normalize_id(value: &Bson) -> Option<ObjectId> {
    match value {
        Bson::ObjectId(id) => Some(*id),
        Bson::String(hex) => Some(object_id_from_hex(hex)),
        _ => None,
    }
}

/// A document identifier in either of its two forms.
///
/// Collection operations accept `impl Into<DocumentId>`, so callers can pass
/// a hex string or an `ObjectId`. Values of unknown type coming from a
/// document go through `DocumentId::try_from(&Bson)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentId {
    /// The 24-character hex form, not yet validated.
    Raw(String),
    /// The native form.
    Native(ObjectId),
}

impl DocumentId {
    /// Resolves this id to its native form. A malformed raw string resolves
    /// to the nil identifier.
    pub fn normalize(&self) -> ObjectId {
        match self {
            DocumentId::Raw(hex) => object_id_from_hex(hex),
            DocumentId::Native(id) => *id,
        }
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Raw(hex) => write!(f, "{}", hex),
            DocumentId::Native(id) => write!(f, "{}", id.to_hex()),
        }
    }
}

impl From<&str> for DocumentId {
    fn from(hex: &str) -> Self {
        DocumentId::Raw(hex.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(hex: String) -> Self {
        DocumentId::Raw(hex)
    }
}

impl From<&String> for DocumentId {
    fn from(hex: &String) -> Self {
        DocumentId::Raw(hex.clone())
    }
}

impl From<ObjectId> for DocumentId {
    fn from(id: ObjectId) -> Self {
        DocumentId::Native(id)
    }
}

impl From<&ObjectId> for DocumentId {
    fn from(id: &ObjectId) -> Self {
        DocumentId::Native(*id)
    }
}

impl TryFrom<&Bson> for DocumentId {
    type Error = OddishError;

    fn try_from(value: &Bson) -> OddishResult<Self> {
        match value {
            Bson::ObjectId(id) => Ok(DocumentId::Native(*id)),
            Bson::String(hex) => Ok(DocumentId::Raw(hex.clone())),
            other => {
                log::error!("Unsupported id type: {:?}", other.element_type());
                Err(OddishError::new(
                    &format!("unsupported id type: {:?}", other.element_type()),
                    ErrorKind::InvalidId,
                ))
            }
        }
    }
}

impl TryFrom<Bson> for DocumentId {
    type Error = OddishError;

    fn try_from(value: Bson) -> OddishResult<Self> {
        DocumentId::try_from(&value)
    }
}
