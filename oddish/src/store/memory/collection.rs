use crate::collection::{DeleteResult, FindOptions, InsertOneResult, UpdateResult};
use crate::common::DOC_ID;
use crate::errors::{ErrorKind, OddishError, OddishResult};
use crate::store::memory::{apply_update, matches, run_pipeline, sort_documents, InMemoryCursor};
use crate::store::{CollectionHandle, DocumentCursor};
use bson::oid::ObjectId;
use bson::{Bson, Document};
use parking_lot::RwLock;
use std::sync::Arc;

/// A collection held entirely in memory.
///
/// Documents keep their insertion order, which is also the order of an
/// unsorted find. Clones share the same documents.
///
/// ```rust,ignore
/// let users = InMemoryCollection::new("users");
/// users.insert_one(doc! { "name": "ada" })?;
/// let collection = OddishCollection::new(users);
/// ```
#[derive(Clone)]
pub struct InMemoryCollection {
    inner: Arc<InMemoryCollectionInner>,
}

impl InMemoryCollection {
    pub fn new(name: &str) -> Self {
        InMemoryCollection {
            inner: Arc::new(InMemoryCollectionInner {
                name: name.to_string(),
                documents: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Creates a collection and inserts `documents` into it in order.
    pub fn with_documents(name: &str, documents: Vec<Document>) -> OddishResult<Self> {
        let collection = InMemoryCollection::new(name);
        for document in documents {
            collection.insert_one(document)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.documents.read().is_empty()
    }

    /// Removes every document.
    pub fn clear(&self) {
        self.inner.documents.write().clear();
    }
}

impl CollectionHandle for InMemoryCollection {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn find(
        &self,
        filter: &Document,
        find_options: &FindOptions,
    ) -> OddishResult<Box<dyn DocumentCursor>> {
        self.inner.find(filter, find_options)
    }

    fn count_documents(&self, filter: &Document) -> OddishResult<u64> {
        self.inner.count_documents(filter)
    }

    fn aggregate(&self, pipeline: &[Document]) -> OddishResult<Box<dyn DocumentCursor>> {
        self.inner.aggregate(pipeline)
    }

    fn insert_one(&self, document: Document) -> OddishResult<InsertOneResult> {
        self.inner.insert_one(document)
    }

    fn update_one(&self, filter: &Document, update: &Document) -> OddishResult<UpdateResult> {
        self.inner.update_one(filter, update)
    }

    fn delete_one(&self, filter: &Document) -> OddishResult<DeleteResult> {
        self.inner.delete_one(filter)
    }
}

struct InMemoryCollectionInner {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl InMemoryCollectionInner {
    fn matching(&self, filter: &Document) -> OddishResult<Vec<Document>> {
        let documents = self.documents.read();
        let mut found = Vec::new();
        for document in documents.iter() {
            if matches(document, filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    fn find(
        &self,
        filter: &Document,
        find_options: &FindOptions,
    ) -> OddishResult<Box<dyn DocumentCursor>> {
        let mut found = self.matching(filter)?;
        if let Some(sort) = find_options.sort_fields() {
            sort_documents(&mut found, sort);
        }

        let skip = to_len(find_options.skip_count());
        let limit = to_len(find_options.limit_count());
        let page: Vec<Document> = found.into_iter().skip(skip).take(limit).collect();

        log::debug!(
            "Found {} documents in {} for filter {}",
            page.len(),
            self.name,
            filter
        );
        Ok(Box::new(InMemoryCursor::new(page)))
    }

    fn count_documents(&self, filter: &Document) -> OddishResult<u64> {
        let documents = self.documents.read();
        let mut count = 0u64;
        for document in documents.iter() {
            if matches(document, filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn aggregate(&self, pipeline: &[Document]) -> OddishResult<Box<dyn DocumentCursor>> {
        let snapshot = self.documents.read().clone();
        let output = run_pipeline(snapshot, pipeline)?;
        Ok(Box::new(InMemoryCursor::new(output)))
    }

    fn insert_one(&self, mut document: Document) -> OddishResult<InsertOneResult> {
        let id = match document.get(DOC_ID) {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert(DOC_ID, id.clone());
                id
            }
        };

        let mut documents = self.documents.write();
        if documents.iter().any(|existing| existing.get(DOC_ID) == Some(&id)) {
            log::error!("Duplicate _id {} in collection {}", id, self.name);
            return Err(OddishError::new(
                &format!("a document with _id {} already exists in {}", id, self.name),
                ErrorKind::DuplicateKey,
            ));
        }

        documents.push(document);
        Ok(InsertOneResult::new(id))
    }

    fn update_one(&self, filter: &Document, update: &Document) -> OddishResult<UpdateResult> {
        let mut documents = self.documents.write();
        for document in documents.iter_mut() {
            if matches(document, filter)? {
                let modified = apply_update(document, update)?;
                return Ok(UpdateResult::new(1, u64::from(modified)));
            }
        }
        Ok(UpdateResult::new(0, 0))
    }

    fn delete_one(&self, filter: &Document) -> OddishResult<DeleteResult> {
        let mut documents = self.documents.write();
        let mut position = None;
        for (index, document) in documents.iter().enumerate() {
            if matches(document, filter)? {
                position = Some(index);
                break;
            }
        }

        match position {
            Some(index) => {
                documents.remove(index);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }
}

fn to_len(count: Option<u64>) -> usize {
    count
        .map(|count| usize::try_from(count).unwrap_or(usize::MAX))
        .unwrap_or(usize::MAX)
}
