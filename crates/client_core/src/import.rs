use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::ImportRequest;
use tracing::info;

use crate::error::FetchError;

pub const IMPORT_SUCCESS_MESSAGE: &str = "CSV file has been successfully imported";
pub const IMPORT_FAILURE_MESSAGE: &str = "import request failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub filename: String,
    pub status: u16,
}

/// Fire-and-forget trigger for the server-side bulk import job.
#[async_trait]
pub trait ImportTrigger: Send + Sync {
    async fn trigger(&self, filename: &str) -> Result<ImportOutcome, FetchError>;
}

pub struct HttpImportTrigger {
    http: Client,
    endpoint: String,
}

impl HttpImportTrigger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ImportTrigger for HttpImportTrigger {
    async fn trigger(&self, filename: &str) -> Result<ImportOutcome, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ImportRequest {
                filename: filename.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        info!(filename, status = status.as_u16(), "import: job triggered");
        Ok(ImportOutcome {
            filename: filename.to_string(),
            status: status.as_u16(),
        })
    }
}
