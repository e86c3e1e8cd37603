use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use client_core::{Credential, CredentialDirectory};
use serde::Deserialize;
use url::Url;

const DEFAULT_SETTINGS_FILE: &str = "concepts.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub import_url: String,
    pub request_timeout_secs: Option<u64>,
    /// Replaces the built-in demo accounts when non-empty.
    pub users: Vec<Credential>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/api/concepts".into(),
            import_url: "http://127.0.0.1:8080/api/import".into(),
            request_timeout_secs: None,
            users: Vec::new(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn credential_directory(&self) -> CredentialDirectory {
        if self.users.is_empty() {
            CredentialDirectory::demo()
        } else {
            CredentialDirectory::new(self.users.clone())
        }
    }
}

/// Defaults, then the settings file, then environment variables.
///
/// An explicit `path` must exist; the default `concepts.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                read_settings_file(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    validate_settings(&settings)?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    parse_settings(&raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("CONCEPTS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = var("CONCEPTS_IMPORT_URL") {
        settings.import_url = v;
    }
    if let Some(v) = var("APP__IMPORT_URL") {
        settings.import_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
}

pub fn validate_settings(settings: &Settings) -> anyhow::Result<()> {
    for (name, value) in [
        ("api_url", &settings.api_url),
        ("import_url", &settings.import_url),
    ] {
        let url = Url::parse(value).with_context(|| format!("{name} '{value}' is not a URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("{name} '{value}' must use http or https");
        }
    }
    Ok(())
}
