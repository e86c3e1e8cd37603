use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpConceptStore, HttpImportTrigger, NoticeLevel};
use shared::domain::{ConceptField, ConceptId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

use config::load_settings;
use render::render;
use shell::{parse_command, ConsoleSession, Flow, ShellCommand};

#[derive(Parser, Debug)]
#[command(name = "concepts", about = "Browse and maintain clinical concepts")]
struct Cli {
    /// Settings file; defaults to ./concepts.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    import_url: Option<String>,
    #[arg(long, short, global = true, env = "CONCEPTS_USERNAME")]
    username: Option<String>,
    #[arg(long, short, global = true, env = "CONCEPTS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the filtered, sorted concept list.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        ascending: bool,
    },
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        alternate_names: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        alternate_names: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Trigger the server-side bulk import job.
    Import {
        #[arg(long)]
        filename: Option<String>,
    },
    /// Interactive session (default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url.clone() {
        settings.api_url = api_url;
    }
    if let Some(import_url) = cli.import_url.clone() {
        settings.import_url = import_url;
    }
    config::validate_settings(&settings)?;

    let mut http = reqwest::Client::builder();
    if let Some(timeout) = settings.request_timeout() {
        http = http.timeout(timeout);
    }
    let http = http.build().context("failed to build HTTP client")?;

    let mut console = ConsoleSession::new(
        settings.credential_directory(),
        Arc::new(HttpConceptStore::with_client(http.clone(), &settings.api_url)),
        Arc::new(HttpImportTrigger::with_client(http, &settings.import_url)),
    );

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            if let (Some(username), Some(password)) = (&cli.username, &cli.password) {
                if let Err(err) = console.login(username, password).await {
                    println!("{err}");
                }
            }
            run_shell(&mut console).await
        }
        command => {
            let (Some(username), Some(password)) = (&cli.username, &cli.password) else {
                bail!("--username and --password are required for one-shot commands");
            };
            console.login(username, password).await?;
            run_once(&mut console, command).await
        }
    }
}

async fn run_shell(console: &mut ConsoleSession) -> Result<()> {
    println!("{}", render(console.view()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        let (flow, message) = console.execute(command).await;
        if flow == Flow::Quit {
            break;
        }
        if let Some(message) = message {
            println!("{message}");
        }
        println!("{}", render(console.view()));
    }
    Ok(())
}

fn one_shot_commands(command: Command) -> Vec<ShellCommand> {
    let set = |field, value: String| ShellCommand::Set { field, value };
    match command {
        Command::List { search, ascending } => {
            let mut commands = vec![ShellCommand::Search(search.unwrap_or_default())];
            if ascending {
                commands.push(ShellCommand::Sort);
            }
            commands
        }
        Command::Create {
            id,
            name,
            description,
            alternate_names,
        } => vec![
            ShellCommand::New,
            set(ConceptField::ConceptId, id),
            set(ConceptField::DisplayName, name),
            set(ConceptField::Description, description),
            set(ConceptField::AlternateNames, alternate_names),
            ShellCommand::Submit,
        ],
        Command::Edit {
            id,
            name,
            description,
            alternate_names,
        } => {
            let mut commands = vec![ShellCommand::Edit(ConceptId::from(id))];
            commands.extend(name.map(|v| set(ConceptField::DisplayName, v)));
            commands.extend(description.map(|v| set(ConceptField::Description, v)));
            commands.extend(alternate_names.map(|v| set(ConceptField::AlternateNames, v)));
            commands.push(ShellCommand::Submit);
            commands
        }
        Command::Delete { id } => vec![ShellCommand::Delete(ConceptId::from(id))],
        Command::Import { filename } => vec![ShellCommand::Import(filename)],
        Command::Shell => Vec::new(),
    }
}

async fn run_once(console: &mut ConsoleSession, command: Command) -> Result<()> {
    let is_list = matches!(command, Command::List { .. });
    for step in one_shot_commands(command) {
        if let (_, Some(message)) = console.execute(step).await {
            bail!(message);
        }
    }

    let view = console.view();
    if let Some(notice) = view.notice() {
        if notice.level == NoticeLevel::Error {
            bail!("{}", notice.message);
        }
        if !is_list {
            println!("{}", notice.message);
        }
    }
    if is_list {
        let mut out = String::new();
        render::render_list(view, &mut out);
        print!("{out}");
    }
    Ok(())
}
