use thiserror::Error;

/// Rejections raised before any write is attempted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Select a component supply")]
    MissingComponent,
    #[error("Quantity is required")]
    MissingQuantity,
    #[error("Quantity must be greater than zero (got {0})")]
    NonPositiveQuantity(i64),
    #[error("Supply {supply_id} is already part of this kit")]
    DuplicateComponent { supply_id: i64 },
    #[error("Supply {0} is not part of the loaded inventory")]
    UnknownSupply(i64),
}

/// A raw record that could not be mapped onto an entity.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("record has no integer `{0}` field")]
    MissingId(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("database lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("{0}")]
    Conflict(String),
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
