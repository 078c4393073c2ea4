//! Layered configuration: defaults, then an optional TOML file, then
//! `SCHEMAPUSH_*` environment variables.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::SchemaPushError;
use crate::types::credentials::{AccessToken, Credentials};

pub const DEFAULT_CONFIG_FILE: &str = "schemapush.toml";
pub const ENV_PREFIX: &str = "SCHEMAPUSH_";
pub const DEFAULT_API_BASE: &str = "https://api.supabase.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base: Url,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub project_ref: Option<String>,
    pub loglevel: String,
    #[serde(default)]
    pub proxy: Option<Url>,
    pub connect_timeout_secs: u64,
    /// Unset means the request waits for the remote indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            access_token: None,
            project_ref: None,
            loglevel: "info".to_string(),
            proxy: None,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Provider chain used by [`Config::load`]; exposed so callers can merge
    /// their own overrides on top. An explicitly named file must exist; the
    /// default `schemapush.toml` is optional.
    pub fn figment(file: Option<&Path>) -> Result<Figment, SchemaPushError> {
        let file = match file {
            Some(path) if !path.is_file() => {
                return Err(SchemaPushError::ConfigFileMissing(path.to_path_buf()));
            }
            Some(path) => path,
            None => Path::new(DEFAULT_CONFIG_FILE),
        };
        Ok(Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn load(file: Option<&Path>) -> Result<Self, SchemaPushError> {
        Ok(Self::figment(file)?.extract()?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn access_token(&self) -> Result<AccessToken, SchemaPushError> {
        let raw = self
            .access_token
            .as_deref()
            .ok_or(SchemaPushError::MissingSetting("access_token (SCHEMAPUSH_ACCESS_TOKEN)"))?;
        AccessToken::new(raw)
    }

    pub fn credentials(&self) -> Result<Credentials, SchemaPushError> {
        let token = self.access_token()?;
        let project_ref = self
            .project_ref
            .as_deref()
            .ok_or(SchemaPushError::MissingSetting("project_ref (SCHEMAPUSH_PROJECT_REF)"))?;
        Credentials::new(token, project_ref)
    }
}

/// Env values are typed by figment, so an all-digit token arrives as a number.
fn opt_string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Raw>::deserialize(de)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    }))
}
