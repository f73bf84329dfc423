use async_trait::async_trait;
use models::ad::AdDocument;
use mongodb::bson::oid::ObjectId;

use crate::errors::ServiceError;

/// Persistence contract for ads.
///
/// Ownership-checked mutations take both the ad id and the caller's
/// `student_id` and must apply them as a single match-and-mutate, so there
/// is no window between the ownership check and the write.
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Insert a new document; returns the store-assigned id.
    async fn insert(&self, doc: AdDocument) -> Result<ObjectId, ServiceError>;
    /// Documents with `hidden == false`, newest first.
    async fn find_visible(&self) -> Result<Vec<AdDocument>, ServiceError>;
    /// All documents owned by `student_id`, newest first.
    async fn find_by_owner(&self, student_id: &str) -> Result<Vec<AdDocument>, ServiceError>;
    /// Delete when both id and owner match; returns whether a document was removed.
    async fn delete_owned(&self, id: ObjectId, student_id: &str) -> Result<bool, ServiceError>;
    /// Flip `hidden` when both id and owner match; returns the new value.
    async fn toggle_hidden_owned(&self, id: ObjectId, student_id: &str) -> Result<Option<bool>, ServiceError>;
    /// Set `hidden = false` on documents lacking the field; returns how many changed.
    async fn backfill_hidden(&self) -> Result<u64, ServiceError>;
}

/// Newest first; ids break ties between ads created in the same millisecond.
pub(crate) fn sort_newest_first(docs: &mut [AdDocument]) {
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

/// In-memory repository with the same matching semantics as the MongoDB one.
/// Backs the unit, integration and benchmark suites.
pub mod mock {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MockAdRepository {
        docs: Mutex<Vec<AdDocument>>,
    }

    impl MockAdRepository {
        /// Store `doc` verbatim, assigning an id if it has none. Unlike
        /// `insert`, a missing `hidden` flag is kept, which is how records
        /// written before the flag existed look.
        pub async fn seed(&self, mut doc: AdDocument) -> ObjectId {
            let id = *doc.id.get_or_insert_with(ObjectId::new);
            self.docs.lock().await.push(doc);
            id
        }

        /// Copy of every stored document in insertion order.
        pub async fn snapshot(&self) -> Vec<AdDocument> {
            self.docs.lock().await.clone()
        }
    }

    #[async_trait]
    impl AdRepository for MockAdRepository {
        async fn insert(&self, mut doc: AdDocument) -> Result<ObjectId, ServiceError> {
            let id = ObjectId::new();
            doc.id = Some(id);
            self.docs.lock().await.push(doc);
            Ok(id)
        }

        async fn find_visible(&self) -> Result<Vec<AdDocument>, ServiceError> {
            let docs = self.docs.lock().await;
            // Mirrors the `{hidden: false}` filter: legacy records without the field do not match.
            let mut out: Vec<AdDocument> = docs.iter().filter(|d| d.hidden == Some(false)).cloned().collect();
            sort_newest_first(&mut out);
            Ok(out)
        }

        async fn find_by_owner(&self, student_id: &str) -> Result<Vec<AdDocument>, ServiceError> {
            let docs = self.docs.lock().await;
            let mut out: Vec<AdDocument> = docs.iter().filter(|d| d.student_id == student_id).cloned().collect();
            sort_newest_first(&mut out);
            Ok(out)
        }

        async fn delete_owned(&self, id: ObjectId, student_id: &str) -> Result<bool, ServiceError> {
            let mut docs = self.docs.lock().await;
            let before = docs.len();
            docs.retain(|d| !(d.id == Some(id) && d.student_id == student_id));
            Ok(docs.len() != before)
        }

        async fn toggle_hidden_owned(&self, id: ObjectId, student_id: &str) -> Result<Option<bool>, ServiceError> {
            let mut docs = self.docs.lock().await;
            Ok(docs
                .iter_mut()
                .find(|d| d.id == Some(id) && d.student_id == student_id)
                .map(|d| {
                    let hidden = !d.is_hidden();
                    d.hidden = Some(hidden);
                    hidden
                }))
        }

        async fn backfill_hidden(&self) -> Result<u64, ServiceError> {
            let mut docs = self.docs.lock().await;
            let mut changed = 0;
            for d in docs.iter_mut().filter(|d| d.hidden.is_none()) {
                d.hidden = Some(false);
                changed += 1;
            }
            Ok(changed)
        }
    }
}
