use reqwest::StatusCode;
use serde::Serialize;

/// Body of `POST /v1/projects/{ref}/query`.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

/// Outcome of the connectivity check: status and raw body, whatever they are.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub status: StatusCode,
    pub body: String,
}

impl ProbeReport {
    pub fn is_authorized(&self) -> bool {
        self.status.is_success()
    }
}
