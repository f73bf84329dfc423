#![cfg(test)]
use configs::DatabaseConfig;
use mongodb::Database;

/// Connection for store-backed tests, or `None` (test skipped) when
/// `MONGO_URI` is not set.
pub async fn get_db() -> Result<Option<Database>, anyhow::Error> {
    let Ok(uri) = std::env::var("MONGO_URI") else {
        eprintln!("MONGO_URI missing; skip document store tests");
        return Ok(None);
    };
    let cfg = DatabaseConfig {
        uri,
        name: std::env::var("MONGO_DB").unwrap_or_else(|_| "ads_db_test".to_string()),
    };
    let db = models::db::connect(&cfg).await?;
    Ok(Some(db))
}
