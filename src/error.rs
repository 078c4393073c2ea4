use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Failures of the single HTTP exchange with the management API.
#[derive(Debug, ThisError)]
pub enum TransportError {
    /// No complete response was received (connect, TLS, timeout or body read).
    #[error(transparent)]
    ConnectionFailed(reqwest::Error),

    /// A response arrived with a status outside `200..300`.
    #[error("Status {}: {}", .status.as_u16(), .body)]
    RemoteRejected { status: StatusCode, body: String },
}

#[derive(Debug, ThisError)]
pub enum SchemaPushError {
    #[error("schema script is empty")]
    EmptyScript,

    #[error("access token is empty")]
    EmptyToken,

    #[error("invalid project reference {0:?}: expected ASCII letters, digits, '-' or '_'")]
    InvalidProjectRef(String),

    #[error("missing {0}; set it in the config file or environment")]
    MissingSetting(&'static str),

    #[error("config file not found: {}", .0.display())]
    ConfigFileMissing(PathBuf),

    #[error("configuration error")]
    Config(#[from] Box<figment::Error>),

    #[error("failed to read schema script {}", .path.display())]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("URL parse error")]
    UrlParse(#[from] url::ParseError),

    #[error("API base URL cannot be used as a base: {0}")]
    InvalidApiBase(String),

    #[error("HTTP client setup error")]
    ClientSetup(#[source] reqwest::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<figment::Error> for SchemaPushError {
    fn from(e: figment::Error) -> Self {
        SchemaPushError::Config(Box::new(e))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::ConnectionFailed(e)
    }
}

impl SchemaPushError {
    /// True when the input was refused locally and nothing was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchemaPushError::EmptyScript
                | SchemaPushError::EmptyToken
                | SchemaPushError::InvalidProjectRef(_)
        )
    }

    /// Render the error and each of its sources, joined with `: `.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }

    /// Status code of a rejected request, if the remote answered.
    pub fn remote_status(&self) -> Option<StatusCode> {
        match self {
            SchemaPushError::Transport(TransportError::RemoteRejected { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }
}
