pub mod directory;
pub mod eutils;

use crate::error::FigcapError;

/// Trait for document retrieval backends.
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the raw XML markup of one document.
    fn fetch(&self, document_id: &str) -> Result<String, FigcapError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
