use configs::DatabaseConfig;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use tracing::info;

use crate::ad::AdDocument;

pub const ADS_COLLECTION: &str = "ads";

/// Connect to the document store and ping it so that an unreachable server
/// fails startup instead of the first request.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(&cfg.uri).await?;
    let db = client.database(&cfg.name);
    db.run_command(doc! { "ping": 1 }, None).await?;
    info!(database = %cfg.name, "document store connected");
    Ok(db)
}

pub fn ads_collection(db: &Database) -> Collection<AdDocument> {
    db.collection::<AdDocument>(ADS_COLLECTION)
}
