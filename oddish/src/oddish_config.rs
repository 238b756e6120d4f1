//! Configuration for collection operations.

use crate::common::DEFAULT_PAGE_SIZE;
use std::sync::Arc;

/// Settings applied by an [`OddishCollection`](crate::collection::OddishCollection).
///
/// Cheap to clone; clones share the same settings.
///
/// # Examples
///
/// ```rust,ignore
/// use oddish::oddish_config::OddishConfig;
///
/// let config = OddishConfig::new()
///     .default_page_size(50)
///     .strict_decode(true);
/// let users = OddishCollection::with_config(handle, config);
/// ```
#[derive(Debug, Clone)]
pub struct OddishConfig {
    inner: Arc<OddishConfigInner>,
}

#[derive(Debug, Clone)]
struct OddishConfigInner {
    default_page_size: u64,
    strict_decode: bool,
}

impl Default for OddishConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OddishConfig {
    /// Creates a configuration with a page size of 20 and lenient decoding.
    pub fn new() -> Self {
        OddishConfig {
            inner: Arc::new(OddishConfigInner {
                default_page_size: DEFAULT_PAGE_SIZE,
                strict_decode: false,
            }),
        }
    }

    /// Page size used by paged reads that ask for a page size of 0.
    ///
    /// A value of 0 is ignored.
    pub fn default_page_size(self, page_size: u64) -> Self {
        if page_size == 0 {
            log::warn!("Ignoring default page size of 0, keeping {}", self.page_size());
            return self;
        }
        self.update(|inner| inner.default_page_size = page_size)
    }

    /// When set, a document that fails to decode makes a read return the
    /// decode error instead of stopping quietly.
    pub fn strict_decode(self, strict: bool) -> Self {
        self.update(|inner| inner.strict_decode = strict)
    }

    pub fn page_size(&self) -> u64 {
        self.inner.default_page_size
    }

    pub fn is_strict_decode(&self) -> bool {
        self.inner.strict_decode
    }

    fn update(self, f: impl FnOnce(&mut OddishConfigInner)) -> Self {
        let mut inner = Arc::unwrap_or_clone(self.inner);
        f(&mut inner);
        OddishConfig {
            inner: Arc::new(inner),
        }
    }
}
