use crate::collection::{
    DeleteResult, DocumentId, FindOptions, InsertOneResult, PageRequest, UpdateResult,
};
use crate::common::{SortableFields, DOC_ID};
use crate::cursor::{materialize, materialize_strict, SafeCursor};
use crate::errors::{OddishError, OddishResult};
use crate::oddish_config::OddishConfig;
use crate::store::CollectionHandle;
use bson::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Typed reads and writes over one collection.
///
/// Every operation makes exactly one call to the collection handle, except
/// [`find_page`](Self::find_page) which counts first and then queries.
/// Errors from the handle are logged and returned as they are; nothing is
/// retried.
///
/// Reads fill a caller-owned `Vec<T>`: elements already in it are
/// overwritten in order, more are appended as needed and the rest are
/// dropped, so afterwards the vector holds exactly the documents read.
///
/// `OddishCollection` is cheap to clone and can be shared across threads.
#[derive(Clone)]
pub struct OddishCollection {
    inner: Arc<OddishCollectionInner>,
}

struct OddishCollectionInner {
    handle: Arc<dyn CollectionHandle>,
    config: OddishConfig,
}

impl OddishCollection {
    /// Wraps `handle` with the default configuration.
    pub fn new<H: CollectionHandle + 'static>(handle: H) -> Self {
        Self::with_config(handle, OddishConfig::default())
    }

    pub fn with_config<H: CollectionHandle + 'static>(handle: H, config: OddishConfig) -> Self {
        Self::from_handle(Arc::new(handle), config)
    }

    /// Wraps a handle that is already shared.
    pub fn from_handle(handle: Arc<dyn CollectionHandle>, config: OddishConfig) -> Self {
        OddishCollection {
            inner: Arc::new(OddishCollectionInner { handle, config }),
        }
    }

    pub fn name(&self) -> String {
        self.inner.handle.name()
    }

    pub fn config(&self) -> &OddishConfig {
        &self.inner.config
    }

    pub fn handle(&self) -> &Arc<dyn CollectionHandle> {
        &self.inner.handle
    }

    /// Fetches the document with the given id.
    ///
    /// Returns `Ok(None)` if no document has that id. A malformed hex string
    /// is looked up as the nil id and so also returns `Ok(None)`.
    pub fn find_by_id<T>(&self, id: impl Into<DocumentId>) -> OddishResult<Option<T>>
    where
        T: DeserializeOwned + Default,
    {
        self.find_one(&id_filter(id.into()))
    }

    /// Fetches the first document matching `filter`.
    ///
    /// Without strict decoding, a matching document that cannot be decoded
    /// into `T` also gives `Ok(None)`.
    pub fn find_one<T>(&self, filter: &Document) -> OddishResult<Option<T>>
    where
        T: DeserializeOwned + Default,
    {
        let mut found: Vec<T> = Vec::with_capacity(1);
        let cursor = self.open(filter, &FindOptions::new().limit(1));
        self.read_into(cursor, &mut found)?;
        Ok(found.pop())
    }

    /// Reads every document matching `filter` into `destination`, in `sort`
    /// order if given. Returns the number of documents read.
    ///
    /// # Errors
    ///
    /// Returns the handle's error if the query fails, in which case
    /// `destination` is left untouched. A failure to close the cursor is returned
    /// after `destination` has been filled.
    pub fn find_many<T>(
        &self,
        destination: &mut Vec<T>,
        filter: &Document,
        sort: Option<&SortableFields>,
    ) -> OddishResult<usize>
    where
        T: DeserializeOwned + Default,
    {
        let mut find_options = FindOptions::new();
        if let Some(sort) = sort {
            find_options = find_options.sort(sort.clone());
        }

        let cursor = self.open(filter, &find_options);
        self.read_into(cursor, destination)
    }

    /// Reads one page of the documents matching `filter` into `destination`
    /// and returns the total number of pages.
    ///
    /// `page` is 1-based and values below 1 read the first page. A
    /// `page_size` of 0 uses the configured default. A page past the end
    /// leaves `destination` empty.
    ///
    /// # Errors
    ///
    /// If counting fails, `destination` is left untouched.
    pub fn find_page<T>(
        &self,
        destination: &mut Vec<T>,
        filter: &Document,
        sort: Option<&SortableFields>,
        page: i64,
        page_size: u64,
    ) -> OddishResult<u64>
    where
        T: DeserializeOwned + Default,
    {
        let request = PageRequest::new(page, page_size).or_size(self.inner.config.page_size());
        let matching = self.count(filter)?;

        let mut find_options = FindOptions::new()
            .skip(request.skip())
            .limit(request.size());
        if let Some(sort) = sort {
            find_options = find_options.sort(sort.clone());
        }

        let cursor = self.open(filter, &find_options);
        self.read_into(cursor, destination)?;
        Ok(request.total_pages(matching))
    }

    /// Runs an aggregation pipeline and reads its output into `destination`.
    pub fn aggregate<T>(&self, destination: &mut Vec<T>, pipeline: &[Document]) -> OddishResult<usize>
    where
        T: DeserializeOwned + Default,
    {
        log::debug!(
            "Running a {} stage pipeline on {}",
            pipeline.len(),
            self.name()
        );
        let cursor = SafeCursor::new(self.inner.handle.aggregate(pipeline));
        self.read_into(cursor, destination)
    }

    /// Opens a cursor for reading documents one at a time.
    ///
    /// The cursor can be shared by reference between threads; each document
    /// goes to exactly one reader.
    pub fn find_cursor(&self, filter: &Document, find_options: &FindOptions) -> SafeCursor {
        self.open(filter, find_options)
    }

    /// Counts the documents matching `filter`.
    pub fn count(&self, filter: &Document) -> OddishResult<u64> {
        self.inner
            .handle
            .count_documents(filter)
            .map_err(|err| logged("count documents", err))
    }

    /// Encodes `value` as a document and inserts it.
    pub fn insert<T: Serialize>(&self, value: &T) -> OddishResult<InsertOneResult> {
        let document = bson::to_document(value)
            .map_err(|err| logged("encode document", OddishError::from(err)))?;
        self.inner
            .handle
            .insert_one(document)
            .map_err(|err| logged("insert document", err))
    }

    pub fn delete_by_id(&self, id: impl Into<DocumentId>) -> OddishResult<DeleteResult> {
        self.inner
            .handle
            .delete_one(&id_filter(id.into()))
            .map_err(|err| logged("delete document", err))
    }

    /// Applies `update` to the document with the given id. The update
    /// document is handed to the handle unchanged, e.g.
    /// `doc! { "$set": { "age": 37 } }`.
    pub fn update_by_id(
        &self,
        id: impl Into<DocumentId>,
        update: &Document,
    ) -> OddishResult<UpdateResult> {
        self.inner
            .handle
            .update_one(&id_filter(id.into()), update)
            .map_err(|err| logged("update document", err))
    }

    fn open(&self, filter: &Document, find_options: &FindOptions) -> SafeCursor {
        log::debug!("Finding documents in {} with filter {}", self.name(), filter);
        SafeCursor::new(self.inner.handle.find(filter, find_options))
    }

    fn read_into<T>(&self, cursor: SafeCursor, destination: &mut Vec<T>) -> OddishResult<usize>
    where
        T: DeserializeOwned + Default,
    {
        if self.inner.config.is_strict_decode() {
            materialize_strict(cursor, destination)
        } else {
            materialize(cursor, destination)
        }
    }
}

fn id_filter(id: DocumentId) -> Document {
    let mut filter = Document::new();
    filter.insert(DOC_ID, id.normalize());
    filter
}

fn logged(operation: &str, err: OddishError) -> OddishError {
    log::error!("Failed to {}: {}", operation, err);
    err
}
