use crate::collection::{DeleteResult, FindOptions, InsertOneResult, UpdateResult};
use crate::errors::OddishResult;
use crate::store::DocumentCursor;
use bson::Document;

/// The collection side of a database client.
///
/// `OddishCollection` performs every read and write through this trait, one
/// call per operation. Implementations own connection handling; they are
/// expected to block until the call completes and to return their own
/// errors unchanged.
///
/// Filters, update documents and pipelines use the client's own query
/// language and are passed through untouched.
pub trait CollectionHandle: Send + Sync {
    /// Returns the name of this collection.
    fn name(&self) -> String;

    /// Runs a query and returns a cursor over the matching documents.
    fn find(
        &self,
        filter: &Document,
        find_options: &FindOptions,
    ) -> OddishResult<Box<dyn DocumentCursor>>;

    /// Counts the documents matching `filter`.
    fn count_documents(&self, filter: &Document) -> OddishResult<u64>;

    /// Runs an aggregation pipeline and returns a cursor over its output.
    fn aggregate(&self, pipeline: &[Document]) -> OddishResult<Box<dyn DocumentCursor>>;

    /// Inserts a single document.
    fn insert_one(&self, document: Document) -> OddishResult<InsertOneResult>;

    /// Applies `update` to the first document matching `filter`.
    fn update_one(&self, filter: &Document, update: &Document) -> OddishResult<UpdateResult>;

    /// Deletes the first document matching `filter`.
    fn delete_one(&self, filter: &Document) -> OddishResult<DeleteResult>;
}
