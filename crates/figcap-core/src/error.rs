#[derive(Debug, thiserror::Error)]
pub enum FigcapError {
    #[error("failed to fetch document: {0}")]
    Fetch(String),

    #[error("fetching document '{id}' returned HTTP {status}")]
    Http { status: u16, id: String },

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("document '{0}' has no <body> element")]
    MissingBody(String),

    #[error("failed to parse CSV: {0}")]
    Csv(String),

    #[error("document store error: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for FigcapError {
    fn from(e: rusqlite::Error) -> Self {
        FigcapError::Store(e.to_string())
    }
}
