use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MongoConfig;
use crate::error::Result;
use crate::models::PlantRecord;

/// Where the plant collection lives between runs.
///
/// The store reads everything once when it opens and hands the full
/// collection back after every mutation.
#[async_trait]
pub trait PlantRepository: Send + Sync {
    async fn load_all(&self) -> Result<Vec<PlantRecord>>;

    async fn save_all(&self, plants: &[PlantRecord]) -> Result<()>;

    fn backend_name(&self) -> &str;
}

/// One JSON array in a single file.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlantRepository for JsonFileRepository {
    async fn load_all(&self) -> Result<Vec<PlantRecord>> {
        if !tokio::fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(Vec::new());
        }
        let json = tokio::fs::read_to_string(&self.path).await?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        let plants: Vec<PlantRecord> = serde_json::from_str(&json)?;
        debug!(path = %self.path.display(), count = plants.len(), "loaded plants");
        Ok(plants)
    }

    async fn save_all(&self, plants: &[PlantRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(plants)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = plants.len(), "saved plants");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "json"
    }
}

const SNAPSHOT_ID: &str = "plants";

/// The whole collection as one MongoDB document.
///
/// Replacing a single document is atomic, so a failed save leaves the previous
/// collection intact. The cost is MongoDB's 16 MB document limit.
#[derive(Debug, Serialize, Deserialize)]
struct PlantSnapshot {
    #[serde(rename = "_id")]
    key: String,
    plants: Vec<PlantRecord>,
}

impl PlantSnapshot {
    fn new(plants: &[PlantRecord]) -> Self {
        Self {
            key: SNAPSHOT_ID.to_string(),
            plants: plants.to_vec(),
        }
    }
}

pub struct MongoRepository {
    collection: Collection<PlantSnapshot>,
}

impl MongoRepository {
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.server_selection_timeout = Some(Duration::from_secs(config.timeout_secs));
        let client = Client::with_options(client_options)?;

        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database = %config.database, collection = %config.collection, "connected to MongoDB");

        Ok(Self {
            collection: db.collection::<PlantSnapshot>(&config.collection),
        })
    }
}

#[async_trait]
impl PlantRepository for MongoRepository {
    async fn load_all(&self) -> Result<Vec<PlantRecord>> {
        let plants = self
            .collection
            .find_one(doc! { "_id": SNAPSHOT_ID })
            .await?
            .map(|snapshot| snapshot.plants)
            .unwrap_or_default();
        debug!(count = plants.len(), "loaded plants from MongoDB");
        Ok(plants)
    }

    async fn save_all(&self, plants: &[PlantRecord]) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": SNAPSHOT_ID }, PlantSnapshot::new(plants))
            .upsert(true)
            .await?;
        debug!(count = plants.len(), "saved plants to MongoDB");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "mongo"
    }
}


#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::models::PlantDraft;

    fn plant(id: &str, name: &str) -> PlantRecord {
        let now = DateTime::parse_from_rfc3339("2024-01-01T08:00:00+01:00").unwrap();
        let draft = PlantDraft {
            name: name.to_string(),
            species: "Pothos".to_string(),
            water_frequency_days: 4,
            notes: Some("kitchen shelf".to_string()),
            ..Default::default()
        };
        PlantRecord::from_draft(id, draft, now, &chrono::Utc).unwrap()
    }

    #[tokio::test]
    async fn json_missing_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(tmp.path().join("plants.json"));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_save_creates_dirs_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(tmp.path().join("nested").join("plants.json"));
        let plants = vec![plant("a", "Kitchen pothos"), plant("b", "Office pothos")];

        repo.save_all(&plants).await.unwrap();
        assert!(repo.path().exists());
        assert!(!repo.path().with_extension("json.tmp").exists());

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded, plants);
    }

    #[tokio::test]
    async fn json_save_overwrites_previous_collection() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(tmp.path().join("plants.json"));
        repo.save_all(&[plant("a", "One"), plant("b", "Two")]).await.unwrap();
        repo.save_all(&[plant("b", "Two")]).await.unwrap();

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
    }

    #[test]
    fn mongo_snapshot_is_one_document_keyed_by_id() {
        let plants = vec![plant("a", "Kitchen pothos"), plant("b", "Office pothos")];
        let document = mongodb::bson::to_document(&PlantSnapshot::new(&plants)).unwrap();
        assert_eq!(document.get_str("_id").unwrap(), SNAPSHOT_ID);
        assert_eq!(document.get_array("plants").unwrap().len(), 2);

        let back: PlantSnapshot = mongodb::bson::from_document(document).unwrap();
        assert_eq!(back.plants, plants);
    }

    #[tokio::test]
    async fn json_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plants.json");
        std::fs::write(&path, "{not json").unwrap();
        let repo = JsonFileRepository::new(path);
        assert!(matches!(repo.load_all().await, Err(crate::error::PlantError::Json(_))));
    }
}
