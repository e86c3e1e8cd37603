//! Client-side core for the clinical concept service: the HTTP record store,
//! the import trigger, the login session and the view model that front ends
//! render.

pub mod collation;
pub mod error;
pub mod import;
#[cfg(any(test, feature = "test-util"))]
pub mod memory_store;
pub mod session;
pub mod store;
pub mod view_model;

pub use collation::locale_cmp;
pub use error::FetchError;
pub use import::{HttpImportTrigger, ImportOutcome, ImportTrigger};
pub use session::{Authenticator, Credential, CredentialDirectory, Session};
#[cfg(any(test, feature = "test-util"))]
pub use memory_store::MemoryConceptStore;
pub use store::{ConceptStore, HttpConceptStore};
pub use view_model::{
    filter_concepts, sort_concepts, FormMode, LoadOutcome, LoadTicket, Notice,
    NoticeLevel, ViewModel,
};
