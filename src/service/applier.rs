use crate::api::ManagementApi;
use crate::error::SchemaPushError;
use crate::types::credentials::{Credentials, validate_project_ref};
use crate::types::management::QueryRequest;
use crate::types::script::SchemaScript;
use std::sync::Arc;
use tracing::{info, warn};

/// Sends one schema script per call. Never retries; whether a second call
/// is safe depends only on the script's own guards.
#[derive(Debug, Clone)]
pub struct SchemaApplier {
    api: ManagementApi,
}

impl SchemaApplier {
    pub fn new(api: ManagementApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ManagementApi {
        &self.api
    }

    pub async fn apply(
        &self,
        script: &SchemaScript,
        creds: &Credentials,
    ) -> Result<String, SchemaPushError> {
        info!(
            project_ref = %creds.project_ref(),
            script_bytes = script.len(),
            "applying schema script"
        );
        match self.api.run_query(creds, script).await {
            Ok(body) => {
                info!(
                    project_ref = %creds.project_ref(),
                    body_len = body.len(),
                    "schema script accepted"
                );
                Ok(body)
            }
            Err(e) => {
                warn!(project_ref = %creds.project_ref(), error = %e, "schema script failed");
                Err(e)
            }
        }
    }

    /// Validate raw text, then apply it. Empty text never reaches the network.
    pub async fn apply_text(
        &self,
        sql: impl Into<Arc<str>>,
        creds: &Credentials,
    ) -> Result<String, SchemaPushError> {
        let script = SchemaScript::new(sql)?;
        self.apply(&script, creds).await
    }

    /// The request `apply` would send, as `POST <url>` followed by the
    /// pretty-printed body. Nothing is sent.
    pub fn preview(
        &self,
        script: &SchemaScript,
        project_ref: &str,
    ) -> Result<String, SchemaPushError> {
        let project_ref = validate_project_ref(project_ref)?;
        let url = self.api.query_url(project_ref)?;
        let body = serde_json::to_string_pretty(&QueryRequest {
            query: script.as_str(),
        })?;
        Ok(format!("POST {url}\n{body}"))
    }
}
