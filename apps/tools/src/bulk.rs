use client_core::{ConceptStore, FetchError};
use futures::{stream, StreamExt};
use shared::domain::{Concept, ConceptId};
use tracing::{info, warn};

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Default)]
pub struct BulkReport {
    pub created: Vec<ConceptId>,
    pub failed: Vec<(ConceptId, FetchError)>,
}

/// Creates each concept once, at most `concurrency` requests at a time.
pub async fn create_all(
    store: &dyn ConceptStore,
    concepts: Vec<Concept>,
    concurrency: usize,
) -> BulkReport {
    let results: Vec<(ConceptId, Result<(), FetchError>)> = stream::iter(concepts)
        .map(|concept| async move {
            let result = store.create(&concept).await;
            (concept.concept_id, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = BulkReport::default();
    for (concept_id, result) in results {
        match result {
            Ok(()) => {
                info!(%concept_id, "tools: created concept");
                report.created.push(concept_id);
            }
            Err(err) => {
                warn!(%concept_id, %err, "tools: create failed");
                report.failed.push((concept_id, err));
            }
        }
    }
    report.created.sort();
    report
}
