//! Line-oriented commands driving a [`ViewModel`].

use std::sync::Arc;

use client_core::{ConceptStore, CredentialDirectory, ImportTrigger, Session, ViewModel};
use shared::{
    domain::{Action, ConceptField, ConceptId, Role},
    error::AuthError,
    protocol::DEFAULT_IMPORT_FILENAME,
};
use tracing::debug;

pub const HELP: &str = "\
commands:
  login <username> <password>   sign in and load concepts
  logout                        sign out
  reload                        fetch the collection again
  search [term]                 filter by any field (no term clears)
  sort                          toggle ascending/descending by id
  new                           start a new concept draft
  edit <id>                     load a concept into the draft
  set <field> <value>           field: id, name, description, alternate-names
  submit                        create or save the draft
  delete <id>                   delete a concept
  import [filename]             trigger the bulk import job (admin)
  show                          redraw the view
  help                          this text
  quit                          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Login { username: String, password: String },
    Logout,
    Reload,
    Search(String),
    Sort,
    New,
    Edit(ConceptId),
    Set { field: ConceptField, value: String },
    Submit,
    Delete(ConceptId),
    Import(Option<String>),
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ShellCommand::Login { .. } => "login",
            ShellCommand::Logout => "logout",
            ShellCommand::Reload => "reload",
            ShellCommand::Search(_) => "search",
            ShellCommand::Sort => "sort",
            ShellCommand::New => "new",
            ShellCommand::Edit(_) => "edit",
            ShellCommand::Set { .. } => "set",
            ShellCommand::Submit => "submit",
            ShellCommand::Delete(_) => "delete",
            ShellCommand::Import(_) => "import",
            ShellCommand::Show => "show",
            ShellCommand::Help => "help",
            ShellCommand::Quit => "quit",
        }
    }
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "login" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(username), Some(password)) => ShellCommand::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err("usage: login <username> <password>".into()),
            }
        }
        "logout" => ShellCommand::Logout,
        "reload" => ShellCommand::Reload,
        "search" => ShellCommand::Search(rest.to_string()),
        "sort" => ShellCommand::Sort,
        "new" => ShellCommand::New,
        "edit" => ShellCommand::Edit(required_id(rest, "edit")?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err("usage: set <field> <value>".into());
            }
            ShellCommand::Set {
                field: field.parse().map_err(|err| format!("{err}"))?,
                value: value.to_string(),
            }
        }
        "submit" | "save" => ShellCommand::Submit,
        "delete" => ShellCommand::Delete(required_id(rest, "delete")?),
        "import" => ShellCommand::Import((!rest.is_empty()).then(|| rest.to_string())),
        "show" | "" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(command)
}

fn required_id(rest: &str, command: &str) -> Result<ConceptId, String> {
    if rest.is_empty() {
        return Err(format!("usage: {command} <id>"));
    }
    Ok(ConceptId::from(rest))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A logged-in (or not) console user: session, view model and the remote
/// collaborators the view model talks to.
pub struct ConsoleSession {
    session: Session<CredentialDirectory>,
    view: ViewModel,
    store: Arc<dyn ConceptStore>,
    importer: Arc<dyn ImportTrigger>,
}

impl ConsoleSession {
    pub fn new(
        directory: CredentialDirectory,
        store: Arc<dyn ConceptStore>,
        importer: Arc<dyn ImportTrigger>,
    ) -> Self {
        Self {
            session: Session::new(directory),
            view: ViewModel::new(),
            store,
            importer,
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Role, AuthError> {
        let role = self.session.login(username, password)?;
        self.view.sign_in(role, self.store.as_ref()).await;
        Ok(role)
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.view.sign_out();
    }

    /// Front-end gating only; the concept store does its own authorization.
    pub fn offers(&self, action: Action) -> Result<(), String> {
        if self.view.can(action) {
            Ok(())
        } else {
            Err(format!(
                "{} is not available for role {}",
                action_name(action),
                self.view.role()
            ))
        }
    }

    /// Runs one command. The returned message is shown above the redrawn view.
    pub async fn execute(&mut self, command: ShellCommand) -> (Flow, Option<String>) {
        debug!(command = command.name(), "console: executing command");
        let message = match command {
            ShellCommand::Quit => return (Flow::Quit, None),
            ShellCommand::Help => Some(HELP.to_string()),
            ShellCommand::Show => None,
            ShellCommand::Login { username, password } => self
                .login(&username, &password)
                .await
                .err()
                .map(|err| err.to_string()),
            ShellCommand::Logout => {
                self.logout();
                None
            }
            ShellCommand::Reload => match self.require_login() {
                Err(msg) => Some(msg),
                Ok(()) => {
                    self.view.reload(self.store.as_ref()).await;
                    None
                }
            },
            ShellCommand::Search(term) => {
                self.view.set_search_term(term);
                None
            }
            ShellCommand::Sort => {
                self.view.toggle_sort();
                None
            }
            ShellCommand::New => match self.offers(Action::Create) {
                Err(msg) => Some(msg),
                Ok(()) => {
                    self.view.begin_create();
                    None
                }
            },
            ShellCommand::Edit(id) => match self.offers(Action::Edit) {
                Err(msg) => Some(msg),
                Ok(()) => self.view.begin_edit(&id).err().map(|err| err.to_string()),
            },
            ShellCommand::Set { field, value } => match self.offers(self.draft_action()) {
                Err(msg) => Some(msg),
                Ok(()) => self
                    .view
                    .set_draft_field(field, value)
                    .err()
                    .map(|err| err.to_string()),
            },
            ShellCommand::Submit => match self.offers(self.draft_action()) {
                Err(msg) => Some(msg),
                Ok(()) => {
                    // Failures are surfaced through the view's notice.
                    let _ = self.view.submit(self.store.as_ref()).await;
                    None
                }
            },
            ShellCommand::Delete(id) => match self.offers(Action::Delete) {
                Err(msg) => Some(msg),
                Ok(()) => {
                    let _ = self.view.delete(&id, self.store.as_ref()).await;
                    None
                }
            },
            ShellCommand::Import(filename) => match self.offers(Action::Import) {
                Err(msg) => Some(msg),
                Ok(()) => {
                    let filename = filename.as_deref().unwrap_or(DEFAULT_IMPORT_FILENAME);
                    let _ = self.view.run_import(self.importer.as_ref(), filename).await;
                    None
                }
            },
        };
        (Flow::Continue, message)
    }

    fn draft_action(&self) -> Action {
        if self.view.editing_id().is_some() {
            Action::Edit
        } else {
            Action::Create
        }
    }

    fn require_login(&self) -> Result<(), String> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err("not logged in".to_string())
        }
    }
}

fn action_name(action: Action) -> &'static str {
    match action {
        Action::Create => "create",
        Action::Edit => "edit",
        Action::Delete => "delete",
        Action::Import => "import",
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use client_core::{FetchError, ImportOutcome, MemoryConceptStore, NoticeLevel};
    use shared::domain::Concept;

    use super::*;

    struct AcceptingImporter;

    #[async_trait]
    impl ImportTrigger for AcceptingImporter {
        async fn trigger(&self, filename: &str) -> Result<ImportOutcome, FetchError> {
            Ok(ImportOutcome {
                filename: filename.to_string(),
                status: 200,
            })
        }
    }

    fn console(store: Arc<MemoryConceptStore>) -> ConsoleSession {
        ConsoleSession::new(CredentialDirectory::demo(), store, Arc::new(AcceptingImporter))
    }

    async fn run(console: &mut ConsoleSession, line: &str) -> Option<String> {
        let command = parse_command(line).expect("parse");
        console.execute(command).await.1
    }

    #[test]
    fn parses_commands_with_free_text_values() {
        assert_eq!(
            parse_command("set description A condition of the  heart").ok(),
            Some(ShellCommand::Set {
                field: ConceptField::Description,
                value: "A condition of the  heart".to_string(),
            })
        );
        assert_eq!(
            parse_command("search").ok(),
            Some(ShellCommand::Search(String::new()))
        );
        assert_eq!(parse_command("import").ok(), Some(ShellCommand::Import(None)));
        assert_eq!(parse_command("  ").ok(), Some(ShellCommand::Show));
    }

    #[test]
    fn rejects_incomplete_commands() {
        assert!(parse_command("login admin").is_err());
        assert!(parse_command("edit").is_err());
        assert!(parse_command("set").is_err());
        assert!(parse_command("set colour red").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[tokio::test]
    async fn invalid_login_reports_message_and_stays_anonymous() {
        let store = Arc::new(MemoryConceptStore::new(Vec::new()));
        let mut console = console(store.clone());

        let message = run(&mut console, "login admin@example.com wrong").await;

        assert_eq!(message.as_deref(), Some("Invalid username or password"));
        assert_eq!(console.view().role(), Role::Anonymous);
        assert_eq!(store.fetch_count().await, 0);
    }

    #[tokio::test]
    async fn viewer_is_not_offered_mutations() {
        let store = Arc::new(MemoryConceptStore::new(vec![Concept::new("A", "Alpha", "", "")]));
        let mut console = console(store.clone());
        assert_eq!(
            run(&mut console, "login viewer@example.com pa$$word4Viewer").await,
            None
        );

        let message = run(&mut console, "delete A").await;

        assert_eq!(
            message.as_deref(),
            Some("delete is not available for role viewer")
        );
        assert_eq!(store.snapshot().await.len(), 1);
        assert!(run(&mut console, "new").await.is_some());
        assert!(run(&mut console, "import").await.is_some());
    }

    #[tokio::test]
    async fn editor_creates_concept_through_commands() {
        let store = Arc::new(MemoryConceptStore::new(Vec::new()));
        let mut console = console(store.clone());
        run(&mut console, "login editor@example.com pa$$word4Editor").await;

        for line in ["new", "set id C1", "set name Foo", "set description d", "submit"] {
            assert_eq!(run(&mut console, line).await, None, "{line}");
        }

        assert_eq!(store.snapshot().await, vec![Concept::new("C1", "Foo", "d", "")]);
        assert_eq!(console.view().collection().len(), 1);
        assert!(run(&mut console, "import").await.is_some());
    }

    #[tokio::test]
    async fn edit_refuses_id_change() {
        let store = Arc::new(MemoryConceptStore::new(vec![Concept::new("A", "Alpha", "", "")]));
        let mut console = console(store);
        run(&mut console, "login editor@example.com pa$$word4Editor").await;
        run(&mut console, "edit A").await;

        let message = run(&mut console, "set id B").await.expect("refused");

        assert!(message.contains("cannot be changed"), "{message}");
    }

    #[tokio::test]
    async fn admin_import_sets_success_notice() {
        let store = Arc::new(MemoryConceptStore::new(Vec::new()));
        let mut console = console(store);
        run(&mut console, "login admin@example.com pa$$word4Admin").await;

        assert_eq!(run(&mut console, "import").await, None);

        let notice = console.view().notice().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn logout_then_reload_requires_login() {
        let store = Arc::new(MemoryConceptStore::new(Vec::new()));
        let mut console = console(store);
        run(&mut console, "login admin@example.com pa$$word4Admin").await;
        run(&mut console, "logout").await;

        assert_eq!(
            run(&mut console, "reload").await.as_deref(),
            Some("not logged in")
        );
        let (flow, _) = console.execute(ShellCommand::Quit).await;
        assert_eq!(flow, Flow::Quit);
    }
}
