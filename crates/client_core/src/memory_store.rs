use async_trait::async_trait;
use reqwest::StatusCode;
use shared::domain::{Concept, ConceptId};
use tokio::sync::Mutex;

use crate::{error::FetchError, store::ConceptStore};

/// In-process store with the remote store's id rules: duplicate creates are
/// rejected with 409, updates and deletes of unknown ids with 404.
///
/// Available to other crates' tests through the `test-util` feature.
#[derive(Default)]
pub struct MemoryConceptStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    concepts: Vec<Concept>,
    unavailable: bool,
    fetch_count: usize,
}

impl MemoryConceptStore {
    pub fn new(concepts: Vec<Concept>) -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                concepts,
                ..MemoryState::default()
            }),
        }
    }

    /// While unavailable every call fails with 503.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().await.unavailable = unavailable;
    }

    pub async fn fetch_count(&self) -> usize {
        self.inner.lock().await.fetch_count
    }

    pub async fn snapshot(&self) -> Vec<Concept> {
        self.inner.lock().await.concepts.clone()
    }
}

impl MemoryState {
    fn check_available(&self) -> Result<(), FetchError> {
        if self.unavailable {
            return Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(())
    }

    fn position(&self, id: &ConceptId) -> Option<usize> {
        self.concepts.iter().position(|c| &c.concept_id == id)
    }
}

#[async_trait]
impl ConceptStore for MemoryConceptStore {
    async fn fetch_all(&self) -> Result<Vec<Concept>, FetchError> {
        let mut state = self.inner.lock().await;
        state.fetch_count += 1;
        state.check_available()?;
        Ok(state.concepts.clone())
    }

    async fn create(&self, concept: &Concept) -> Result<(), FetchError> {
        let mut state = self.inner.lock().await;
        state.check_available()?;
        if state.position(&concept.concept_id).is_some() {
            return Err(FetchError::Status(StatusCode::CONFLICT));
        }
        state.concepts.push(concept.clone());
        Ok(())
    }

    async fn update(&self, id: &ConceptId, concept: &Concept) -> Result<(), FetchError> {
        let mut state = self.inner.lock().await;
        state.check_available()?;
        let Some(index) = state.position(id) else {
            return Err(FetchError::Status(StatusCode::NOT_FOUND));
        };
        let mut replacement = concept.clone();
        replacement.concept_id = id.clone();
        state.concepts[index] = replacement;
        Ok(())
    }

    async fn delete(&self, id: &ConceptId) -> Result<(), FetchError> {
        let mut state = self.inner.lock().await;
        state.check_available()?;
        let Some(index) = state.position(id) else {
            return Err(FetchError::Status(StatusCode::NOT_FOUND));
        };
        state.concepts.remove(index);
        Ok(())
    }
}
