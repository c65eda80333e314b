use crate::domain::error::{AppError, Result};
use crate::domain::store_config::StoreConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SETTINGS_FILE: &str = "survey-intake.toml";
pub const STORE_ENV_PREFIX: &str = "GITHUB_";

/// Non-secret server settings: defaults, then `survey-intake.toml`, then `INTAKE_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub csv_path: String,
    pub commit_message: String,
    pub api_base_url: String,
    pub user_agent: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            csv_path: "data/submissions.csv".to_string(),
            commit_message: "append submission".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            user_agent: "survey-intake".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(SETTINGS_FILE))
                .merge(Env::prefixed("INTAKE_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| AppError::ConfigurationError(format!("Invalid server settings: {}", e)))
    }
}

// Values from a caller-supplied figment may be typed (`"owner": 1234`), so
// fields are read as loose values and rendered back to text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStoreConfig {
    token: Option<Value>,
    owner: Option<Value>,
    repo: Option<Value>,
    branch: Option<Value>,
}

#[derive(Clone)]
enum StoreSource {
    Environment,
    Fixed(Figment),
}

/// Reads the repository credentials on every call, so a request always sees
/// the current environment.
#[derive(Clone)]
pub struct ConfigLoader {
    source: StoreSource,
}

impl ConfigLoader {
    pub fn new(figment: Figment) -> Self {
        Self {
            source: StoreSource::Fixed(figment),
        }
    }

    /// `GITHUB_TOKEN`, `GITHUB_OWNER`, `GITHUB_REPO`, `GITHUB_BRANCH`.
    pub fn from_env() -> Self {
        Self {
            source: StoreSource::Environment,
        }
    }

    fn figment(&self) -> Figment {
        match &self.source {
            StoreSource::Environment => Figment::from(Serialized::defaults(store_env_vars())),
            StoreSource::Fixed(figment) => figment.clone(),
        }
    }

    pub fn load_store_config(&self) -> Result<StoreConfig> {
        let raw: RawStoreConfig = self.figment().extract().map_err(|e| {
            AppError::ConfigurationError(format!("Invalid GitHub env vars: {}", e))
        })?;

        match (
            non_empty(raw.token),
            non_empty(raw.owner),
            non_empty(raw.repo),
            non_empty(raw.branch),
        ) {
            (Some(token), Some(owner), Some(repo), Some(branch)) => Ok(StoreConfig {
                token,
                owner,
                repo,
                branch,
            }),
            _ => Err(AppError::ConfigurationError(
                "Missing GitHub env vars".to_string(),
            )),
        }
    }
}

/// `GITHUB_*` variables as raw strings keyed by lowercase suffix.
///
/// `Env` would parse `007` or `1.10` into numbers and lose the original text,
/// so the values go in through `Serialized` untouched.
fn store_env_vars() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter_map(|(key, value)| {
            key.strip_prefix(STORE_ENV_PREFIX)
                .map(|name| (name.to_ascii_lowercase(), value))
        })
        .collect()
}

fn non_empty(value: Option<Value>) -> Option<String> {
    let text = match value? {
        Value::Null => return None,
        Value::String(s) => s,
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
