use async_trait::async_trait;

use caduceus_application::PrivilegeRepository;
use caduceus_core::{AppError, AppResult};
use caduceus_domain::{RoleAssignment, RoleDefinition};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::privilege_rows::{
    ASSIGNMENT_REST_SELECT, AssignmentRow, ROLE_REST_SELECT, RoleRow, decode_roles,
};

const ASSIGNMENTS_TABLE: &str = "role_assignments";
const ROLES_TABLE: &str = "roles";

/// Repository reading privileges through the data platform's REST query API.
///
/// Filters use the PostgREST operator syntax (`eq.`, `in.(...)`).
#[derive(Clone)]
pub struct RestPrivilegeRepository {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl RestPrivilegeRepository {
    /// Creates a repository for the platform rooted at `base_url`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        mut base_url: Url,
        api_key: impl Into<String>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        }
    }

    pub(crate) fn assignments_url(&self, principal_id: &str) -> AppResult<Url> {
        let mut url = self.table_url(ASSIGNMENTS_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", ASSIGNMENT_REST_SELECT)
            .append_pair("platform_id", format!("eq.{principal_id}").as_str())
            .append_pair("is_active", "eq.true")
            .append_pair("order", "created_at.asc,id.asc");
        Ok(url)
    }

    pub(crate) fn roles_url(&self, role_ids: &[String]) -> AppResult<Url> {
        let mut url = self.table_url(ROLES_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", ROLE_REST_SELECT)
            .append_pair("id", in_filter(role_ids).as_str())
            .append_pair("order", "rank.asc,id.asc");
        Ok(url)
    }

    fn table_url(&self, table: &str) -> AppResult<Url> {
        self.base_url
            .join(format!("rest/v1/{table}").as_str())
            .map_err(|error| AppError::Internal(format!("invalid REST url for '{table}': {error}")))
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, url: Url, resource: &str) -> AppResult<Vec<T>> {
        let response = self
            .http_client
            .get(url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| {
                warn!(resource, %error, "REST request failed");
                AppError::Internal(format!("failed to load {resource}: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(resource, %status, "REST request rejected");
            return Err(AppError::Internal(format!(
                "failed to load {resource}: store responded with {status}: {body}"
            )));
        }

        response.json::<Vec<T>>().await.map_err(|error| {
            AppError::Internal(format!("failed to decode {resource}: {error}"))
        })
    }
}

#[async_trait]
impl PrivilegeRepository for RestPrivilegeRepository {
    async fn list_active_assignments(&self, principal_id: &str) -> AppResult<Vec<RoleAssignment>> {
        let url = self.assignments_url(principal_id)?;
        let rows = self
            .fetch_rows::<AssignmentRow>(url, "role assignments")
            .await?;

        Ok(rows.into_iter().map(RoleAssignment::from).collect())
    }

    async fn list_role_definitions(&self, role_ids: &[String]) -> AppResult<Vec<RoleDefinition>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.roles_url(role_ids)?;
        let rows = self.fetch_rows::<RoleRow>(url, "role definitions").await?;

        decode_roles(rows)
    }
}

/// Builds an `in.(...)` filter with every value double-quoted.
fn in_filter(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|value| format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[cfg(test)]
mod tests;
