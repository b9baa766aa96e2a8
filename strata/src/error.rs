use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The backend reported that the target index pattern resolves to
    /// nothing. Absorbed at the search-request boundary; callers of the
    /// annotation builder never see it.
    #[error("No indices match pattern: {0}")]
    MissingIndices(String),

    /// Any other transport or query failure, carrying the backend's own
    /// status code and reason. Never retried.
    #[error("Backend error ({status}): {reason}")]
    Backend { status: u16, reason: String },

    /// No registered strategy claimed viability for the index pattern.
    /// Unreachable while the default strategy is seeded; indicates a
    /// registry set up without it.
    #[error("No viable search strategy for index pattern: {0}")]
    NoViableStrategy(String),

    #[error("Invalid time interval: {0}")]
    InvalidInterval(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
