use crate::api::ManagementApi;
use crate::error::SchemaPushError;
use crate::types::credentials::AccessToken;
use crate::types::management::ProbeReport;
use tracing::{info, warn};

/// Read-only credential check against the organization listing.
pub async fn check(api: &ManagementApi, token: &AccessToken) -> Result<ProbeReport, SchemaPushError> {
    let report = api.list_organizations(token).await?;
    if report.is_authorized() {
        info!(status = %report.status, "management API reachable, token accepted");
    } else {
        warn!(status = %report.status, "management API refused the token");
    }
    Ok(report)
}
