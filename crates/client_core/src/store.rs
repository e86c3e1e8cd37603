use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Concept, ConceptId},
    protocol::ConceptIdQuery,
};
use tracing::debug;

use crate::error::FetchError;

/// CRUD access to the remote concept collection.
///
/// Every call is a single attempt. Callers re-fetch the whole collection
/// after a mutation instead of patching local state.
#[async_trait]
pub trait ConceptStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Concept>, FetchError>;
    async fn create(&self, concept: &Concept) -> Result<(), FetchError>;
    async fn update(&self, id: &ConceptId, concept: &Concept) -> Result<(), FetchError>;
    async fn delete(&self, id: &ConceptId) -> Result<(), FetchError>;
}

pub struct HttpConceptStore {
    http: Client,
    endpoint: String,
}

impl HttpConceptStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn id_query(id: &ConceptId) -> ConceptIdQuery {
        ConceptIdQuery {
            concept_id: id.clone(),
        }
    }
}

#[async_trait]
impl ConceptStore for HttpConceptStore {
    async fn fetch_all(&self) -> Result<Vec<Concept>, FetchError> {
        let concepts: Vec<Concept> = self
            .http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = concepts.len(), "concepts: fetched collection");
        Ok(concepts)
    }

    async fn create(&self, concept: &Concept) -> Result<(), FetchError> {
        self.http
            .post(&self.endpoint)
            .json(concept)
            .send()
            .await?
            .error_for_status()?;
        debug!(concept_id = %concept.concept_id, "concepts: created");
        Ok(())
    }

    async fn update(&self, id: &ConceptId, concept: &Concept) -> Result<(), FetchError> {
        self.http
            .put(&self.endpoint)
            .query(&Self::id_query(id))
            .json(concept)
            .send()
            .await?
            .error_for_status()?;
        debug!(concept_id = %id, "concepts: updated");
        Ok(())
    }

    async fn delete(&self, id: &ConceptId) -> Result<(), FetchError> {
        self.http
            .delete(&self.endpoint)
            .query(&Self::id_query(id))
            .send()
            .await?
            .error_for_status()?;
        debug!(concept_id = %id, "concepts: deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
