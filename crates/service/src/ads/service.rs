use std::sync::Arc;

use common::types::{Ad, CreateAdForm};
use models::ad::{self, AdDocument, NewAd};
use mongodb::bson::oid::ObjectId;
use tracing::{info, instrument};

use super::repository::AdRepository;
use crate::errors::ServiceError;

/// Ad business service independent of web framework.
///
/// Ownership is an equality match on the caller-supplied `student_id`; it is
/// not cross-checked against the allow-list. A missing ad and an ad owned by
/// someone else are both reported as [`ServiceError::NotFound`].
#[derive(Clone)]
pub struct AdService {
    repo: Arc<dyn AdRepository>,
}

impl AdService {
    pub fn new(repo: Arc<dyn AdRepository>) -> Self { Self { repo } }

    /// Visible ads, newest first.
    pub async fn list_public(&self) -> Result<Vec<Ad>, ServiceError> {
        let docs = self.repo.find_visible().await?;
        Ok(docs.into_iter().map(Ad::from).collect())
    }

    /// Every ad owned by `student_id`, hidden or not, newest first.
    pub async fn list_by_owner(&self, student_id: &str) -> Result<Vec<Ad>, ServiceError> {
        let docs = self.repo.find_by_owner(student_id).await?;
        Ok(docs.into_iter().map(Ad::from).collect())
    }

    /// Validate the form and persist a new visible ad; returns its hex id.
    ///
    /// # Examples
    /// ```
    /// use common::types::CreateAdForm;
    /// use service::ads::{AdService, repository::mock::MockAdRepository};
    /// use std::sync::Arc;
    /// let svc = AdService::new(Arc::new(MockAdRepository::default()));
    /// let form = CreateAdForm {
    ///     apartment: Some("101".into()),
    ///     title: Some("Room".into()),
    ///     content: Some("desc".into()),
    ///     student_id: Some("S1".into()),
    ///     ..Default::default()
    /// };
    /// let id = tokio_test::block_on(svc.create(form)).unwrap();
    /// let mine = tokio_test::block_on(svc.list_by_owner("S1")).unwrap();
    /// assert_eq!(mine[0].id, id);
    /// assert!(!mine[0].hidden);
    /// ```
    #[instrument(skip(self, form), fields(student_id = form.student_id.as_deref().unwrap_or_default()))]
    pub async fn create(&self, form: CreateAdForm) -> Result<String, ServiceError> {
        let new_ad = NewAd::try_from(form)?;
        let doc = AdDocument::from_new(new_ad, ad::now());
        let id = self.repo.insert(doc).await?;
        info!(ad_id = %id, "ad_created");
        Ok(id.to_hex())
    }

    /// Delete an ad owned by `student_id`.
    #[instrument(skip(self))]
    pub async fn delete(&self, ad_id: &str, student_id: &str) -> Result<(), ServiceError> {
        let id = parse_ad_id(ad_id)?;
        if !self.repo.delete_owned(id, student_id).await? {
            return Err(ServiceError::not_found("ad"));
        }
        info!(ad_id = %id, "ad_deleted");
        Ok(())
    }

    /// Flip visibility of an ad owned by `student_id`; returns the new `hidden` value.
    #[instrument(skip(self))]
    pub async fn toggle_hide(&self, ad_id: &str, student_id: &str) -> Result<bool, ServiceError> {
        let id = parse_ad_id(ad_id)?;
        let hidden = self
            .repo
            .toggle_hidden_owned(id, student_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("ad"))?;
        info!(ad_id = %id, hidden, "ad_visibility_toggled");
        Ok(hidden)
    }

    /// Backfill `hidden = false` on records that predate the flag. Safe to
    /// run on every start.
    pub async fn reconcile_on_startup(&self) -> Result<u64, ServiceError> {
        let updated = self.repo.backfill_hidden().await?;
        info!(updated, "ads_reconciled");
        Ok(updated)
    }
}

/// A malformed id cannot name any ad, so it is reported like a missing one.
fn parse_ad_id(ad_id: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(ad_id).map_err(|_| ServiceError::not_found("ad"))
}
