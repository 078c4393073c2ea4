use crate::config::Config;
use crate::error::{SchemaPushError, TransportError};
use crate::types::credentials::{AccessToken, Credentials};
use crate::types::management::{ProbeReport, QueryRequest};
use crate::types::script::SchemaScript;
use tracing::debug;
use url::Url;

/// Build the HTTP client from config: timeouts, user agent and optional proxy.
pub fn build_http_client(cfg: &Config) -> Result<reqwest::Client, SchemaPushError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("schemapush/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(cfg.connect_timeout());
    if let Some(timeout) = cfg.request_timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(SchemaPushError::ClientSetup)?;
        builder = builder.proxy(proxy);
    }
    builder.build().map_err(SchemaPushError::ClientSetup)
}

/// Stateless client for the two management endpoints this tool uses.
#[derive(Debug, Clone)]
pub struct ManagementApi {
    client: reqwest::Client,
    base: Url,
}

impl ManagementApi {
    pub fn new(client: reqwest::Client, base: Url) -> Result<Self, SchemaPushError> {
        if base.cannot_be_a_base() {
            return Err(SchemaPushError::InvalidApiBase(base.to_string()));
        }
        // `Url::join` replaces the last segment unless the path ends in '/'.
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, SchemaPushError> {
        Self::new(build_http_client(cfg)?, cfg.api_base.clone())
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn query_url(&self, project_ref: &str) -> Result<Url, SchemaPushError> {
        Ok(self.base.join(&format!("v1/projects/{project_ref}/query"))?)
    }

    pub fn organizations_url(&self) -> Result<Url, SchemaPushError> {
        Ok(self.base.join("v1/organizations")?)
    }

    /// POST the script to the query endpoint. 2xx yields the raw body,
    /// anything else is `RemoteRejected` with the raw body attached.
    pub async fn run_query(
        &self,
        creds: &Credentials,
        script: &SchemaScript,
    ) -> Result<String, SchemaPushError> {
        let url = self.query_url(creds.project_ref())?;
        let resp = self
            .client
            .post(url)
            .bearer_auth(creds.token().secret())
            .json(&QueryRequest {
                query: script.as_str(),
            })
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TransportError::from)?;
        debug!(status = %status, body_len = body.len(), "query endpoint responded");

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::RemoteRejected { status, body }.into())
        }
    }

    /// GET the organization listing. Any status is reported, not raised.
    pub async fn list_organizations(
        &self,
        token: &AccessToken,
    ) -> Result<ProbeReport, SchemaPushError> {
        let url = self.organizations_url()?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(token.secret())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TransportError::from)?;
        Ok(ProbeReport { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ManagementApi {
        ManagementApi::new(reqwest::Client::new(), Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn endpoints_join_onto_base() {
        let api = api("https://api.supabase.com");
        assert_eq!(
            api.query_url("sbljtekgogrkelfhxtxq").unwrap().as_str(),
            "https://api.supabase.com/v1/projects/sbljtekgogrkelfhxtxq/query"
        );
        assert_eq!(
            api.organizations_url().unwrap().as_str(),
            "https://api.supabase.com/v1/organizations"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let api = api("http://127.0.0.1:9000/mgmt");
        assert_eq!(api.base().as_str(), "http://127.0.0.1:9000/mgmt/");
        assert_eq!(
            api.query_url("abc").unwrap().as_str(),
            "http://127.0.0.1:9000/mgmt/v1/projects/abc/query"
        );
    }

    #[test]
    fn opaque_base_rejected() {
        let err = ManagementApi::new(
            reqwest::Client::new(),
            Url::parse("mailto:ops@example.com").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaPushError::InvalidApiBase(_)));
    }

    #[test]
    fn client_builds_with_timeouts_and_proxy() {
        let cfg = Config {
            request_timeout_secs: Some(5),
            proxy: Some(Url::parse("http://127.0.0.1:3128").unwrap()),
            ..Config::default()
        };
        assert!(ManagementApi::from_config(&cfg).is_ok());
    }
}
