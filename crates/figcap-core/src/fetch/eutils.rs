use std::time::Duration;

use tracing::debug;

use crate::error::FigcapError;
use crate::fetch::DocumentFetcher;

/// NCBI E-utilities efetch endpoint for PubMed Central full text.
pub const DEFAULT_ENDPOINT: &str =
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi?db=pmc&id={id}";

/// Placeholder replaced by the document id in an endpoint template.
pub const ID_PLACEHOLDER: &str = "{id}";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches documents with one blocking HTTP GET each. No retries.
pub struct EutilsFetcher {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl EutilsFetcher {
    /// Create a fetcher for an endpoint template containing `{id}`.
    pub fn new(endpoint: &str) -> Result<Self, FigcapError> {
        if !endpoint.contains(ID_PLACEHOLDER) {
            return Err(FigcapError::Config(format!(
                "endpoint '{endpoint}' has no {ID_PLACEHOLDER} placeholder"
            )));
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("figcap/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FigcapError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(EutilsFetcher {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// The request URL for a document; the id is percent-encoded.
    pub fn url_for(&self, document_id: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(document_id.as_bytes()).collect();
        self.endpoint.replace(ID_PLACEHOLDER, &encoded)
    }
}

impl DocumentFetcher for EutilsFetcher {
    fn fetch(&self, document_id: &str) -> Result<String, FigcapError> {
        let url = self.url_for(document_id);
        debug!(%url, "fetching document");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FigcapError::Fetch(format!("{document_id}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FigcapError::Http {
                status: status.as_u16(),
                id: document_id.to_string(),
            });
        }

        response
            .text()
            .map_err(|e| FigcapError::Fetch(format!("{document_id}: failed to read body: {e}")))
    }

    fn backend_name(&self) -> &str {
        "eutils"
    }
}
