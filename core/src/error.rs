use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("City '{name}' not found")]
    CityNotFound { name: String },

    #[error("Robot '{id}' not found")]
    RobotNotFound { id: String },

    #[error("Building '{id}' not found")]
    BuildingNotFound { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
