use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::info;

use super::errors::AuthError;

/// On-disk shape of the allow-list source.
#[derive(Deserialize)]
struct StudentDb {
    valid_students: Vec<String>,
}

/// Set of student ids allowed to log in. Built once at startup and never
/// mutated afterwards; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    /// Read `{"valid_students": [...]}` from `path`.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| AuthError::AllowList(format!("cannot read {}: {e}", path.display())))?;
        let list = Self::from_json_slice(&bytes)?;
        info!(path = %path.display(), entries = list.len(), "allow-list loaded");
        Ok(list)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, AuthError> {
        let db: StudentDb = serde_json::from_slice(bytes)
            .map_err(|e| AuthError::AllowList(format!("invalid allow-list: {e}")))?;
        Ok(db.valid_students.into_iter().collect())
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.ids.contains(student_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for AllowList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_student_db_and_dedups() {
        let list = AllowList::from_json_slice(br#"{"valid_students": ["S1", "S2", "S1"]}"#).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("S1"));
        assert!(!list.contains("s1"));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(
            AllowList::from_json_slice(br#"["S1"]"#),
            Err(AuthError::AllowList(_))
        ));
    }

    #[tokio::test]
    async fn load_from_file_and_missing_file() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("student_db_{}.json", std::process::id()));
        tokio::fs::write(&tmp, br#"{"valid_students": ["1001", "1002"]}"#).await?;
        let list = AllowList::load(&tmp).await?;
        assert!(list.contains("1002"));
        let _ = tokio::fs::remove_file(&tmp).await;

        assert!(AllowList::load(&tmp).await.is_err());
        Ok(())
    }
}
