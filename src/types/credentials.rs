use std::fmt;

use crate::error::SchemaPushError;

/// Bearer token for the management API. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SchemaPushError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(SchemaPushError::EmptyToken);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Trim and check a project reference for use as a URL path segment.
pub fn validate_project_ref(raw: &str) -> Result<&str, SchemaPushError> {
    let project_ref = raw.trim();
    let path_safe = project_ref
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if project_ref.is_empty() || !path_safe {
        return Err(SchemaPushError::InvalidProjectRef(project_ref.to_string()));
    }
    Ok(project_ref)
}

/// Token plus the project the schema is applied to.
#[derive(Debug, Clone)]
pub struct Credentials {
    token: AccessToken,
    project_ref: String,
}

impl Credentials {
    /// The project reference ends up in the URL path, so only
    /// `[A-Za-z0-9_-]` is accepted.
    pub fn new(token: AccessToken, project_ref: impl AsRef<str>) -> Result<Self, SchemaPushError> {
        let project_ref = validate_project_ref(project_ref.as_ref())?;
        Ok(Self {
            token,
            project_ref: project_ref.to_string(),
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn project_ref(&self) -> &str {
        &self.project_ref
    }
}
