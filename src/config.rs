use std::env;
use std::path::PathBuf;

use crate::error::{PlantError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Json,
    Mongo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub data_file: PathBuf,
    pub mongo: MongoConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match get("PLANTCARE_STORAGE").as_deref().map(str::trim) {
            None => StorageBackend::Json,
            Some(v) if v.eq_ignore_ascii_case("json") => StorageBackend::Json,
            Some(v) if v.eq_ignore_ascii_case("mongo") || v.eq_ignore_ascii_case("mongodb") => {
                StorageBackend::Mongo
            }
            Some(other) => {
                return Err(PlantError::Config(format!(
                    "PLANTCARE_STORAGE must be 'json' or 'mongo', got '{other}'"
                )))
            }
        };

        let data_file = match get("PLANTCARE_DATA_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_data_file()?,
        };

        let timeout_secs = match get("MONGO_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| PlantError::Config(format!("MONGO_TIMEOUT_SECS is not a number: '{raw}'")))?,
            None => 10,
        };

        Ok(Self {
            storage,
            data_file,
            mongo: MongoConfig {
                uri: get("MONGO_URI").unwrap_or_else(|| "mongodb://localhost:27017/plantcare".to_string()),
                database: get("MONGO_DATABASE").unwrap_or_else(|| "plantcare".to_string()),
                collection: get("MONGO_COLLECTION").unwrap_or_else(|| "plants".to_string()),
                timeout_secs,
            },
        })
    }
}

/// `<data dir>/plantcare/plants.json`, e.g. `~/.local/share/plantcare/plants.json`.
fn default_data_file() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| PlantError::Config("could not determine user data directory".to_string()))?;
    Ok(base.join("plantcare").join("plants.json"))
}
