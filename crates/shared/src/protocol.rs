use serde::{Deserialize, Serialize};

use crate::domain::ConceptId;

/// File the import job reads when no other name is given.
pub const DEFAULT_IMPORT_FILENAME: &str = "clinical_concepts.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub filename: String,
}

impl Default for ImportRequest {
    fn default() -> Self {
        Self {
            filename: DEFAULT_IMPORT_FILENAME.to_string(),
        }
    }
}

/// Query string addressing one record on `PUT`/`DELETE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptIdQuery {
    pub concept_id: ConceptId,
}
