use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Insufficient balance: {requested} points requested, {available} available")]
    InsufficientBalance { requested: u64, available: u64 },
    #[error("Unauthorized: no caller identity supplied")]
    Unauthorized,
    #[error("{entity} `{id}` already exists")]
    AlreadyExists { entity: &'static str, id: String },
    #[error("Version conflict on {entity} `{id}`: expected {expected}, found {found}")]
    VersionConflict {
        entity: &'static str,
        id: String,
        expected: u64,
        found: u64,
    },
    #[error("Gave up updating {entity} `{id}` after {attempts} conflicting writes")]
    Contended {
        entity: &'static str,
        id: String,
        attempts: u32,
    },
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Journal error: {0}")]
    Journal(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// HTTP-like status class a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidArgument(_) | Self::InsufficientBalance { .. } | Self::Journal(_) => 400,
            Self::Unauthorized => 401,
            Self::AlreadyExists { .. } | Self::VersionConflict { .. } | Self::Contended { .. } => {
                409
            }
            Self::StoreUnavailable(_) | Self::Io(_) | Self::Csv(_) | Self::Config(_) => 500,
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        Self::StoreUnavailable(Box::new(err))
    }
}
