use futures::TryStreamExt;
use models::ad::AdDocument;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};

use crate::ads::repository::AdRepository;
use crate::errors::ServiceError;

pub struct MongoAdRepository {
    pub collection: Collection<AdDocument>,
}

impl MongoAdRepository {
    pub fn new(db: &Database) -> Self {
        Self { collection: models::db::ads_collection(db) }
    }

    async fn find_sorted(&self, filter: Document) -> Result<Vec<AdDocument>, ServiceError> {
        let opts = FindOptions::builder().sort(doc! { "created_at": -1, "_id": -1 }).build();
        let cursor = self
            .collection
            .find(filter, opts)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        cursor.try_collect().await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}

#[async_trait::async_trait]
impl AdRepository for MongoAdRepository {
    async fn insert(&self, doc: AdDocument) -> Result<ObjectId, ServiceError> {
        let res = self
            .collection
            .insert_one(&doc, None)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        res.inserted_id
            .as_object_id()
            .ok_or_else(|| ServiceError::Db("inserted id is not an ObjectId".into()))
    }

    async fn find_visible(&self) -> Result<Vec<AdDocument>, ServiceError> {
        self.find_sorted(doc! { "hidden": false }).await
    }

    async fn find_by_owner(&self, student_id: &str) -> Result<Vec<AdDocument>, ServiceError> {
        self.find_sorted(doc! { "student_id": student_id }).await
    }

    async fn delete_owned(&self, id: ObjectId, student_id: &str) -> Result<bool, ServiceError> {
        let res = self
            .collection
            .delete_one(doc! { "_id": id, "student_id": student_id }, None)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.deleted_count > 0)
    }

    async fn toggle_hidden_owned(&self, id: ObjectId, student_id: &str) -> Result<Option<bool>, ServiceError> {
        // Pipeline update so the flip reads and writes the same document atomically.
        let flip = vec![doc! {
            "$set": { "hidden": { "$not": [ { "$ifNull": ["$hidden", false] } ] } }
        }];
        let opts = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id, "student_id": student_id }, flip, opts)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(updated.map(|d| d.is_hidden()))
    }

    async fn backfill_hidden(&self) -> Result<u64, ServiceError> {
        let res = self
            .collection
            .update_many(
                doc! { "hidden": { "$exists": false } },
                doc! { "$set": { "hidden": false } },
                None,
            )
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.modified_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::ad::{now, NewAd};

    fn new_ad(student_id: &str) -> NewAd {
        NewAd {
            apartment: 7,
            author: "Ann".into(),
            title: "Lamp".into(),
            content: "Works fine".into(),
            student_id: student_id.into(),
        }
    }

    #[tokio::test]
    async fn mongo_repository_ownership_and_visibility() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = MongoAdRepository::new(&db);
        let owner = format!("owner-{}", ObjectId::new().to_hex());

        let id = repo.insert(AdDocument::from_new(new_ad(&owner), now())).await?;
        assert!(repo.find_visible().await?.iter().any(|d| d.id == Some(id)));

        assert_eq!(repo.toggle_hidden_owned(id, "someone-else").await?, None);
        assert_eq!(repo.toggle_hidden_owned(id, &owner).await?, Some(true));
        assert!(!repo.find_visible().await?.iter().any(|d| d.id == Some(id)));
        assert_eq!(repo.find_by_owner(&owner).await?.len(), 1);

        assert!(!repo.delete_owned(id, "someone-else").await?);
        assert!(repo.delete_owned(id, &owner).await?);
        assert!(repo.find_by_owner(&owner).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn mongo_backfill_is_idempotent() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = MongoAdRepository::new(&db);
        let owner = format!("legacy-{}", ObjectId::new().to_hex());

        let mut legacy = AdDocument::from_new(new_ad(&owner), now());
        legacy.hidden = None;
        repo.collection.insert_one(&legacy, None).await?;

        assert!(repo.backfill_hidden().await? >= 1);
        assert_eq!(repo.backfill_hidden().await?, 0);
        let mine = repo.find_by_owner(&owner).await?;
        assert_eq!(mine[0].hidden, Some(false));

        repo.collection.delete_many(doc! { "student_id": owner.as_str() }, None).await?;
        Ok(())
    }
}
