use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(pub String);

impl ConceptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConceptId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConceptId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A clinical concept record as exchanged with the concept store.
///
/// `parent_ids` and `child_ids` are optional on the wire and are not part of
/// search or ordering; they are kept so a full-record update does not drop
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub concept_id: ConceptId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alternate_names: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_ids: Vec<ConceptId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<ConceptId>,
}

impl Concept {
    pub fn new(
        concept_id: impl Into<ConceptId>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        alternate_names: impl Into<String>,
    ) -> Self {
        Self {
            concept_id: concept_id.into(),
            display_name: display_name.into(),
            description: description.into(),
            alternate_names: alternate_names.into(),
            parent_ids: Vec::new(),
            child_ids: Vec::new(),
        }
    }

    pub fn with_hierarchy(mut self, parent_ids: &[&str], child_ids: &[&str]) -> Self {
        self.parent_ids = parent_ids.iter().copied().map(ConceptId::from).collect();
        self.child_ids = child_ids.iter().copied().map(ConceptId::from).collect();
        self
    }

    /// The four free-text fields matched by search, in display order.
    pub fn searchable_fields(&self) -> [&str; 4] {
        [
            self.concept_id.as_str(),
            &self.display_name,
            &self.description,
            &self.alternate_names,
        ]
    }

    pub fn field(&self, field: ConceptField) -> &str {
        match field {
            ConceptField::ConceptId => self.concept_id.as_str(),
            ConceptField::DisplayName => &self.display_name,
            ConceptField::Description => &self.description,
            ConceptField::AlternateNames => &self.alternate_names,
        }
    }

    pub fn set_field(&mut self, field: ConceptField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ConceptField::ConceptId => self.concept_id = ConceptId(value),
            ConceptField::DisplayName => self.display_name = value,
            ConceptField::Description => self.description = value,
            ConceptField::AlternateNames => self.alternate_names = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptField {
    ConceptId,
    DisplayName,
    Description,
    AlternateNames,
}

impl ConceptField {
    pub const ALL: [ConceptField; 4] = [
        ConceptField::ConceptId,
        ConceptField::DisplayName,
        ConceptField::Description,
        ConceptField::AlternateNames,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConceptField::ConceptId => "Concept ID",
            ConceptField::DisplayName => "Display Name",
            ConceptField::Description => "Description",
            ConceptField::AlternateNames => "Alternate Names",
        }
    }
}

impl FromStr for ConceptField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "id" | "conceptid" => Ok(ConceptField::ConceptId),
            "name" | "displayname" => Ok(ConceptField::DisplayName),
            "description" => Ok(ConceptField::Description),
            "alternatenames" | "synonyms" => Ok(ConceptField::AlternateNames),
            _ => Err(ParseError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not logged in.
    #[default]
    #[serde(rename = "none", alias = "anonymous")]
    Anonymous,
    Viewer,
    Editor,
    Admin,
}

impl Role {
    pub fn is_authenticated(self) -> bool {
        self != Role::Anonymous
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Anonymous => "none",
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            "" | "none" | "anonymous" => Ok(Role::Anonymous),
            _ => Err(ParseError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Edit,
    Delete,
    Import,
}

/// Actions a front end may offer to a session holding `role`.
///
/// This only decides what is displayed; the concept store performs its own
/// authorization.
pub fn visible_actions(role: Role) -> BTreeSet<Action> {
    match role {
        Role::Anonymous | Role::Viewer => BTreeSet::new(),
        Role::Editor => BTreeSet::from([Action::Create, Action::Edit, Action::Delete]),
        Role::Admin => BTreeSet::from([
            Action::Create,
            Action::Edit,
            Action::Delete,
            Action::Import,
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_and_anonymous_see_no_mutations() {
        assert!(visible_actions(Role::Anonymous).is_empty());
        assert!(visible_actions(Role::Viewer).is_empty());
    }

    #[test]
    fn editor_can_mutate_but_not_import() {
        let actions = visible_actions(Role::Editor);
        assert!(actions.contains(&Action::Create));
        assert!(actions.contains(&Action::Edit));
        assert!(actions.contains(&Action::Delete));
        assert!(!actions.contains(&Action::Import));
    }

    #[test]
    fn admin_sees_every_action() {
        assert_eq!(visible_actions(Role::Admin).len(), 4);
        assert!(visible_actions(Role::Admin).contains(&Action::Import));
    }

    #[test]
    fn concept_uses_camel_case_wire_names() {
        let concept = Concept::new("C1", "Foo", "d", "");
        let json = serde_json::to_value(&concept).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "conceptId": "C1",
                "displayName": "Foo",
                "description": "d",
                "alternateNames": ""
            })
        );
    }

    #[test]
    fn concept_tolerates_missing_optional_fields() {
        let concept: Concept = serde_json::from_str(
            r#"{"conceptId":"C002","displayName":"Diabetes Mellitus","parentIds":["P003"]}"#,
        )
        .expect("deserialize");
        assert_eq!(concept.concept_id, ConceptId::from("C002"));
        assert_eq!(concept.description, "");
        assert_eq!(concept.parent_ids, vec![ConceptId::from("P003")]);
        assert!(concept.child_ids.is_empty());
    }

    #[test]
    fn parses_field_aliases() {
        assert_eq!("id".parse::<ConceptField>().ok(), Some(ConceptField::ConceptId));
        assert_eq!(
            "alternate-names".parse::<ConceptField>().ok(),
            Some(ConceptField::AlternateNames)
        );
        assert!("parentIds".parse::<ConceptField>().is_err());
    }

    #[test]
    fn parses_roles() {
        assert_eq!("Admin".parse::<Role>().ok(), Some(Role::Admin));
        assert_eq!("none".parse::<Role>().ok(), Some(Role::Anonymous));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn role_wire_name_matches_display() {
        for role in [Role::Anonymous, Role::Viewer, Role::Editor, Role::Admin] {
            let json = serde_json::to_value(role).expect("serialize");
            assert_eq!(json, serde_json::json!(role.as_str()));
            let back: Role = serde_json::from_value(json).expect("deserialize");
            assert_eq!(back, role);
        }
        let legacy: Role = serde_json::from_str("\"anonymous\"").expect("alias");
        assert_eq!(legacy, Role::Anonymous);
    }
}
