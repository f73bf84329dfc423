//! Wire types exchanged over HTTP between the services.
//!
//! The ads service produces these as JSON, the gateway consumes them. Form
//! payloads are `application/x-www-form-urlencoded` on both hops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Public JSON view of a stored ad.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ad {
    pub id: String,
    pub apartment: i64,
    #[serde(default)]
    pub author: String,
    pub title: String,
    pub content: String,
    pub student_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub hidden: bool,
}

/// Raw create-ad form. Every field is optional on the wire so that
/// validation happens in one place and reports a client error instead of
/// an extractor rejection.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CreateAdForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Form (or query) carrying only the caller's student id.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StudentForm {
    pub student_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdCreated {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdDeleted {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VisibilityToggled {
    pub message: String,
    pub hidden: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginAccepted {
    pub student_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_json_defaults_missing_author_and_hidden() {
        let ad: Ad = serde_json::from_value(serde_json::json!({
            "id": "65f000000000000000000001",
            "apartment": 101,
            "title": "Room",
            "content": "desc",
            "student_id": "S1",
            "created_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(ad.author, "");
        assert!(!ad.hidden);
    }

    #[test]
    fn create_form_skips_absent_fields() {
        let form = CreateAdForm {
            apartment: Some("101".into()),
            title: Some("Room".into()),
            ..Default::default()
        };
        let v = serde_json::to_value(&form).unwrap();
        assert_eq!(v, serde_json::json!({"apartment": "101", "title": "Room"}));
    }
}
