use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for parsing, progress mutation, and persistence.
///
/// Parsing and initialization only ever fail with `InvalidArgument`;
/// everything storage-shaped propagates unchanged through the use-case
/// layer so the caller decides how to present it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A script with identical content (same hash) is already imported.
    #[error("episode {0} is already imported")]
    DuplicateImport(String),

    #[error("episode {0} not found")]
    NotFound(String),

    /// Stored JSON does not deserialize into the expected shape. Fails
    /// closed: partial data is never coerced into a default.
    #[error("stored data for episode {episode_id} is malformed: {source}")]
    MalformedPersisted {
        episode_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize episode data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
