use std::path::PathBuf;

use crate::error::FigcapError;
use crate::fetch::DocumentFetcher;

/// Reads `<dir>/<id>.xml` from a local directory of previously downloaded documents.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryFetcher { root: root.into() }
    }

    pub fn path_for(&self, document_id: &str) -> PathBuf {
        self.root.join(format!("{document_id}.xml"))
    }
}

impl DocumentFetcher for DirectoryFetcher {
    fn fetch(&self, document_id: &str) -> Result<String, FigcapError> {
        if document_id.contains(['/', '\\']) || document_id.starts_with('.') {
            return Err(FigcapError::Fetch(format!(
                "invalid document id '{document_id}'"
            )));
        }
        let path = self.path_for(document_id);
        std::fs::read_to_string(&path)
            .map_err(|e| FigcapError::Fetch(format!("{}: {e}", path.display())))
    }

    fn backend_name(&self) -> &str {
        "directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_document_by_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("PMC1.xml"), "<article/>").unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("PMC1").unwrap(), "<article/>");
        assert!(matches!(fetcher.fetch("PMC2"), Err(FigcapError::Fetch(_))));
    }

    #[test]
    fn rejects_path_like_ids() {
        let fetcher = DirectoryFetcher::new("/tmp");
        assert!(fetcher.fetch("../etc/passwd").is_err());
        assert!(fetcher.fetch("a/b").is_err());
    }
}
