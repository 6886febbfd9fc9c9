//! Error types for annoyb

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnoybError>;

#[derive(Error, Debug)]
pub enum AnnoybError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Compose error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Relationship check failed: {0}")]
    Relationship(#[from] RelationshipError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnoybError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AnnoybError::Config(_) => 3,
            AnnoybError::Authentication(_) => 2,
            AnnoybError::Api(ApiError::Status { status: 401, .. }) => 2,
            AnnoybError::Compose(_) => 4,
            AnnoybError::Relationship(_) => 5,
            AnnoybError::Api(_) => 1,
            AnnoybError::Io(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Tweet exceeds length limit ({length} > {limit} characters)")]
    LengthExceeded { length: usize, limit: usize },

    #[error("No value for template field '{0}'")]
    MissingField(String),

    #[error("Template field '{0}' must be a string, number or boolean")]
    UnsupportedField(String),

    #[error("Malformed template: {0}")]
    Template(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationshipError {
    #[error("User {source_name} blocking {target_name}")]
    Blocking {
        source_name: String,
        target_name: String,
    },

    #[error("User {source_name} blocked by {target_name}")]
    BlockedBy {
        source_name: String,
        target_name: String,
    },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Twitter API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Unexpected(String),
}
