use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shared::{
    domain::{visible_actions, Action, Concept, ConceptField, ConceptId, Role},
    error::DraftError,
};
use tracing::{debug, error, info};

use crate::{
    collation::locale_cmp,
    error::FetchError,
    import::{ImportOutcome, ImportTrigger, IMPORT_FAILURE_MESSAGE, IMPORT_SUCCESS_MESSAGE},
    store::ConceptStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking message for the user. Only the latest one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Identifies one issued collection load. Tickets increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    /// A newer load was issued after this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<'a> {
    Create,
    Edit(&'a ConceptId),
}

/// Keeps a concept iff `term` is a case-insensitive substring of its id,
/// display name, description or alternate names. An empty term keeps all.
pub fn filter_concepts<'a>(collection: &'a [Concept], term: &str) -> Vec<&'a Concept> {
    let needle = term.to_lowercase();
    collection
        .iter()
        .filter(|concept| {
            needle.is_empty()
                || concept
                    .searchable_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn sort_concepts(concepts: &mut [&Concept], ascending: bool) {
    concepts.sort_by(|a, b| {
        let order = locale_cmp(a.concept_id.as_str(), b.concept_id.as_str());
        if ascending {
            order
        } else {
            order.reverse()
        }
    });
}

/// Owned state behind a concept list screen.
///
/// Holds the collection mirrored from a [`ConceptStore`], the search and
/// sort controls, the create/edit draft and the session role. Front ends
/// render [`ViewModel::visible_concepts`] and offer only the actions that
/// [`ViewModel::can`] allows.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    collection: Vec<Concept>,
    is_loading: bool,
    search_term: String,
    sort_ascending_by_id: bool,
    draft: Concept,
    editing_id: Option<ConceptId>,
    role: Role,
    notice: Option<Notice>,
    is_importing: bool,
    last_loaded_at: Option<DateTime<Utc>>,
    issued_loads: u64,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &[Concept] {
        &self.collection
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_importing(&self) -> bool {
        self.is_importing
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_ascending_by_id(&self) -> bool {
        self.sort_ascending_by_id
    }

    pub fn draft(&self) -> &Concept {
        &self.draft
    }

    pub fn editing_id(&self) -> Option<&ConceptId> {
        self.editing_id.as_ref()
    }

    pub fn mode(&self) -> FormMode<'_> {
        match &self.editing_id {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    pub fn visible_actions(&self) -> BTreeSet<Action> {
        visible_actions(self.role)
    }

    pub fn can(&self, action: Action) -> bool {
        self.visible_actions().contains(&action)
    }

    /// Enters the authenticated state and loads the collection.
    pub async fn sign_in(&mut self, role: Role, store: &dyn ConceptStore) -> LoadOutcome {
        if !role.is_authenticated() {
            self.sign_out();
            return LoadOutcome::Failed;
        }
        self.role = role;
        self.reload(store).await
    }

    /// Drops everything, including the collection, back to the initial state.
    pub fn sign_out(&mut self) {
        *self = Self::default();
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued_loads += 1;
        self.is_loading = true;
        LoadTicket(self.issued_loads)
    }

    /// Applies a load response if `ticket` is the most recently issued one.
    ///
    /// A failed load clears the collection rather than keeping stale rows.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Concept>, FetchError>,
    ) -> LoadOutcome {
        if ticket.0 != self.issued_loads {
            debug!(
                seq = ticket.0,
                latest = self.issued_loads,
                "concepts: dropping stale load response"
            );
            return LoadOutcome::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(concepts) => {
                let count = concepts.len();
                self.collection = concepts;
                self.last_loaded_at = Some(Utc::now());
                debug!(seq = ticket.0, count, "concepts: collection replaced");
                LoadOutcome::Loaded(count)
            }
            Err(err) => {
                error!(seq = ticket.0, %err, "concepts: failed to fetch collection");
                self.collection.clear();
                self.notice = Some(Notice::error(err.user_message()));
                LoadOutcome::Failed
            }
        }
    }

    pub async fn reload(&mut self, store: &dyn ConceptStore) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = store.fetch_all().await;
        self.finish_load(ticket, result)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn toggle_sort(&mut self) {
        self.sort_ascending_by_id = !self.sort_ascending_by_id;
    }

    /// The filtered, then sorted, projection of the collection.
    pub fn visible_concepts(&self) -> Vec<&Concept> {
        let mut visible = filter_concepts(&self.collection, &self.search_term);
        sort_concepts(&mut visible, self.sort_ascending_by_id);
        visible
    }

    pub fn begin_create(&mut self) {
        self.draft = Concept::default();
        self.editing_id = None;
    }

    pub fn begin_edit(&mut self, id: &ConceptId) -> Result<(), DraftError> {
        let concept = self
            .collection
            .iter()
            .find(|concept| &concept.concept_id == id)
            .ok_or_else(|| DraftError::UnknownConcept(id.clone()))?;
        self.draft = concept.clone();
        self.editing_id = Some(id.clone());
        Ok(())
    }

    pub fn set_draft_field(
        &mut self,
        field: ConceptField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        if let (ConceptField::ConceptId, Some(editing)) = (field, &self.editing_id) {
            return Err(DraftError::ConceptIdLocked(editing.clone()));
        }
        self.draft.set_field(field, value);
        Ok(())
    }

    /// Creates or updates from the draft depending on the form mode.
    ///
    /// On success the collection is reloaded and the form reset. On failure
    /// the draft is kept as-is and an error notice is set.
    pub async fn submit(&mut self, store: &dyn ConceptStore) -> Result<(), FetchError> {
        let result = match &self.editing_id {
            None => store.create(&self.draft).await,
            Some(id) => store.update(id, &self.draft).await,
        };

        let concept_id = self.draft.concept_id.clone();
        match result {
            Ok(()) => {
                let verb = if self.editing_id.is_some() {
                    "Saved"
                } else {
                    "Added"
                };
                info!(%concept_id, "concepts: {} concept", verb.to_lowercase());
                self.begin_create();
                self.notice = Some(Notice::info(format!("{verb} concept {concept_id}")));
                self.reload(store).await;
                Ok(())
            }
            Err(err) => {
                error!(%concept_id, %err, "concepts: failed to save concept");
                self.notice = Some(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Deletes without confirmation, then reloads.
    pub async fn delete(
        &mut self,
        id: &ConceptId,
        store: &dyn ConceptStore,
    ) -> Result<(), FetchError> {
        match store.delete(id).await {
            Ok(()) => {
                info!(concept_id = %id, "concepts: deleted concept");
                if self.editing_id.as_ref() == Some(id) {
                    self.begin_create();
                }
                self.notice = Some(Notice::info(format!("Deleted concept {id}")));
                self.reload(store).await;
                Ok(())
            }
            Err(err) => {
                error!(concept_id = %id, %err, "concepts: failed to delete concept");
                self.notice = Some(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    pub async fn run_import(
        &mut self,
        trigger: &dyn ImportTrigger,
        filename: &str,
    ) -> Result<ImportOutcome, FetchError> {
        self.is_importing = true;
        self.notice = None;
        let result = trigger.trigger(filename).await;
        self.is_importing = false;

        match &result {
            Ok(_) => self.notice = Some(Notice::info(IMPORT_SUCCESS_MESSAGE)),
            Err(err) => {
                error!(filename, %err, "import: request failed");
                self.notice = Some(Notice::error(IMPORT_FAILURE_MESSAGE));
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
