use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlantError {
    #[error("invalid watering frequency '{0}': must be a whole number of days >= 1")]
    InvalidFrequency(String),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("plant not found: {0}")]
    NotFound(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

pub type Result<T> = std::result::Result<T, PlantError>;
