use chrono::{DateTime, Utc};
use common::types::{Ad, CreateAdForm};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// An ad as stored in the `ads` collection.
///
/// `hidden` is optional because records written before the visibility flag
/// existed do not carry it; the startup reconciliation backfills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub apartment: i64,
    #[serde(default)]
    pub author: String,
    pub title: String,
    pub content: String,
    pub student_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl AdDocument {
    /// A fresh, visible document for `new`, stamped with `created_at`.
    pub fn from_new(new: NewAd, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            apartment: new.apartment,
            author: new.author,
            title: new.title,
            content: new.content,
            student_id: new.student_id,
            created_at,
            hidden: Some(false),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

impl From<AdDocument> for Ad {
    fn from(d: AdDocument) -> Self {
        Self {
            id: d.id.map(|id| id.to_hex()).unwrap_or_default(),
            apartment: d.apartment,
            author: d.author,
            title: d.title,
            content: d.content,
            student_id: d.student_id,
            created_at: d.created_at,
            hidden: d.hidden.unwrap_or(false),
        }
    }
}

/// Current time truncated to what the store can represent (milliseconds).
pub fn now() -> DateTime<Utc> {
    mongodb::bson::DateTime::now().to_chrono()
}

/// Validated input for creating an ad.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAd {
    pub apartment: i64,
    pub author: String,
    pub title: String,
    pub content: String,
    pub student_id: String,
}

impl TryFrom<CreateAdForm> for NewAd {
    type Error = ModelError;

    fn try_from(form: CreateAdForm) -> Result<Self, Self::Error> {
        let apartment = validate_apartment(form.apartment.as_deref())?;
        let title = required("title", form.title)?;
        let content = required("content", form.content)?;
        let student_id = required("student_id", form.student_id)?;
        Ok(Self {
            apartment,
            author: form.author.unwrap_or_default(),
            title,
            content,
            student_id,
        })
    }
}

pub fn validate_apartment(raw: Option<&str>) -> Result<i64, ModelError> {
    let raw = raw.ok_or_else(|| ModelError::Validation("apartment is required".into()))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ModelError::Validation("apartment must be an integer".into()))
}

/// Present and not blank; the submitted value is kept as is.
fn required(field: &str, value: Option<String>) -> Result<String, ModelError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ModelError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn form() -> CreateAdForm {
        CreateAdForm {
            apartment: Some("101".into()),
            author: None,
            title: Some("Room".into()),
            content: Some("desc".into()),
            student_id: Some("S1".into()),
        }
    }

    #[test]
    fn new_ad_from_valid_form() {
        let ad = NewAd::try_from(form()).unwrap();
        assert_eq!(ad.apartment, 101);
        assert_eq!(ad.author, "");
        assert_eq!(ad.title, "Room");
        assert_eq!(ad.student_id, "S1");
    }

    #[test]
    fn apartment_must_be_integer() {
        let mut f = form();
        f.apartment = Some("10a".into());
        assert!(matches!(NewAd::try_from(f), Err(ModelError::Validation(_))));

        let mut f = form();
        f.apartment = None;
        assert!(matches!(NewAd::try_from(f), Err(ModelError::Validation(_))));

        let mut f = form();
        f.apartment = Some(" -3 ".into());
        assert_eq!(NewAd::try_from(f).unwrap().apartment, -3);
    }

    #[test]
    fn required_fields_reject_blank() {
        for field in ["title", "content", "student_id"] {
            let mut f = form();
            match field {
                "title" => f.title = Some("   ".into()),
                "content" => f.content = None,
                _ => f.student_id = Some(String::new()),
            }
            let err = NewAd::try_from(f).unwrap_err();
            assert!(err.to_string().contains(field), "{err}");
        }
    }

    #[test]
    fn legacy_document_without_hidden_reads_as_visible() {
        let raw = bson::doc! {
            "_id": ObjectId::new(),
            "apartment": 12_i32,
            "title": "Desk",
            "content": "free",
            "student_id": "S9",
            "created_at": bson::DateTime::now(),
        };
        let doc: AdDocument = bson::from_document(raw).unwrap();
        assert_eq!(doc.hidden, None);
        assert_eq!(doc.author, "");
        assert!(!doc.is_hidden());

        let view = Ad::from(doc.clone());
        assert!(!view.hidden);
        assert_eq!(view.id, doc.id.unwrap().to_hex());
    }

    #[test]
    fn fresh_document_serializes_hidden_false() {
        let doc = AdDocument::from_new(NewAd::try_from(form()).unwrap(), now());
        let raw = bson::to_document(&doc).unwrap();
        assert!(!raw.get_bool("hidden").unwrap());
        assert!(raw.get("_id").is_none());
        assert!(raw.get_datetime("created_at").is_ok());
    }
}
