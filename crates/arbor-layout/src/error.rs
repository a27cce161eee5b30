#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed tree at node {id}: {message}")]
    MalformedTree { id: usize, message: String },

    #[error("invalid chart config: {message}")]
    InvalidConfig { message: String },

    #[error("size reported for unknown node {id}")]
    UnknownNode { id: usize },

    #[error("size measurement was cancelled before a report arrived")]
    MeasurementCancelled,

    #[error("chart JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
