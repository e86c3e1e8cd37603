use serde::{Deserialize, Serialize};
use shared::{domain::Role, error::AuthError};
use tracing::{info, warn};

/// Maps a username/password pair to a role.
///
/// Stand-in boundary for an external identity provider.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Result<Role, AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// Plaintext credential table. Not a security boundary.
#[derive(Debug, Clone, Default)]
pub struct CredentialDirectory {
    users: Vec<Credential>,
}

impl CredentialDirectory {
    pub fn new(users: Vec<Credential>) -> Self {
        Self { users }
    }

    /// One demo account per role.
    pub fn demo() -> Self {
        Self::new(vec![
            Credential::new("editor@example.com", "pa$$word4Editor", Role::Editor),
            Credential::new("viewer@example.com", "pa$$word4Viewer", Role::Viewer),
            Credential::new("admin@example.com", "pa$$word4Admin", Role::Admin),
        ])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Authenticator for CredentialDirectory {
    fn authenticate(&self, username: &str, password: &str) -> Result<Role, AuthError> {
        self.users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .map(|user| user.role)
            .ok_or(AuthError::InvalidCredentials)
    }
}

pub struct Session<A: Authenticator = CredentialDirectory> {
    authenticator: A,
    username: Option<String>,
    role: Role,
}

impl<A: Authenticator> Session<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            username: None,
            role: Role::Anonymous,
        }
    }

    /// A failed attempt leaves any existing login untouched.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Role, AuthError> {
        match self.authenticator.authenticate(username, password) {
            Ok(role) => {
                info!(username, %role, "session: logged in");
                self.username = Some(username.to_string());
                self.role = role;
                Ok(role)
            }
            Err(err) => {
                warn!(username, "session: login rejected");
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.username.take() {
            info!(%username, "session: logged out");
        }
        self.role = Role::Anonymous;
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.role.is_authenticated()
    }
}
