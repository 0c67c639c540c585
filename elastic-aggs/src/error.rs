//! Error types for aggregation builders

/// Aggregation builder errors
#[derive(Debug, thiserror::Error)]
pub enum AggError {
    /// A nested aggregation or script could not be rendered.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AggError {
    /// Elasticsearch-style error type, used in log output.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Serialization(_) | Self::Json(_) => "serialization_exception",
            Self::Decode(_) => "parse_exception",
            Self::Config(_) | Self::Toml(_) => "settings_exception",
            Self::Io(_) => "io_exception",
        }
    }
}
