//! Jira REST response bodies shared by the client.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::Issue;

/// `GET /rest/api/2/search` or `/search/jql` response. Paging fields
/// (`total`, `nextPageToken`, ...) are ignored.
#[derive(Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// `GET /rest/api/2/serverInfo` response.
#[derive(Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub version: String,
    #[serde(rename = "baseUrl", default)]
    pub base_url: String,
    /// "Cloud" on Atlassian-hosted sites; absent on older Server releases
    #[serde(rename = "deploymentType", default)]
    pub deployment_type: String,
}

/// Error body Jira sends alongside 4xx/5xx statuses.
#[derive(Deserialize, Default)]
pub struct ErrorBody {
    #[serde(rename = "errorMessages", default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl ErrorBody {
    /// Flatten into a single line, or `None` if Jira gave no messages.
    pub fn summary(&self) -> Option<String> {
        let messages: Vec<String> = self
            .error_messages
            .iter()
            .cloned()
            .chain(
                self.errors
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}")),
            )
            .collect();

        if messages.is_empty() {
            None
        } else {
            Some(messages.join(", "))
        }
    }
}
