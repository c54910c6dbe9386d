use log::debug;
use mongodb::bson::{doc, Bson, Document};
use mongodb::sync::Client;
use serde::Deserialize;
use serde_json::Value;

use super::error::SourceError;
use super::RecordSource;

/// Default connection string; an unreachable server fails the fetch after
/// five seconds instead of the driver's thirty.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/?serverSelectionTimeoutMS=5000";

/// Connection settings for the live telemetry collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection holding one document per telemetry record
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: "tevel-15".to_string(),
            collection: "telemetry".to_string(),
        }
    }
}

/// Live record source backed by a MongoDB collection.
///
/// A client is created for every fetch and dropped when it returns; no
/// connection outlives a single iteration.
#[derive(Debug, Clone)]
pub struct MongoSource {
    config: MongoConfig,
    label: String,
}

impl MongoSource {
    /// Create a source for the configured collection.
    pub fn new(config: MongoConfig) -> Self {
        let label = format!("mongodb {}.{}", config.database, config.collection);
        Self { config, label }
    }
}

impl RecordSource for MongoSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_documents(&self) -> Result<Vec<Value>, SourceError> {
        let client = Client::with_uri_str(&self.config.uri)
            .map_err(|e| SourceError::Connection(e.to_string()))?;
        let collection = client
            .database(&self.config.database)
            .collection::<Document>(&self.config.collection);

        let cursor = collection
            .find(doc! {})
            .run()
            .map_err(|e| SourceError::Query(e.to_string()))?;

        let mut documents = Vec::new();
        for result in cursor {
            let document = result.map_err(|e| SourceError::Query(e.to_string()))?;
            documents.push(Bson::Document(document).into_relaxed_extjson());
        }

        debug!("Fetched {} documents from {}", documents.len(), self.label);
        Ok(documents)
    }
}
