use thiserror::Error;

use crate::domain::ConceptId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown concept field '{0}'")]
    UnknownField(String),
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("concept id cannot be changed while editing {0}")]
    ConceptIdLocked(ConceptId),
    #[error("no concept with id {0} in the current collection")]
    UnknownConcept(ConceptId),
}
