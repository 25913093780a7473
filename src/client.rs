use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{JiraFrogError, Result};
use crate::responses::{ErrorBody, SearchResponse, ServerInfo};
use crate::types::Issue;

const API_PREFIX: &str = "rest/api/2";
const SEARCH_FIELDS: &str = "summary,status,description";
const SEARCH_MAX_RESULTS: &str = "50";

/// `deploymentType` reported by Atlassian-hosted sites
const CLOUD_DEPLOYMENT: &str = "Cloud";

/// Authenticated session against one Jira server.
pub struct JiraClient {
    http: Client,
    server: String,
    username: String,
    token: String,
    deployment_type: String,
}

impl JiraClient {
    /// Build the session and make the first request. Credentials are not checked
    /// separately; a bad token shows up as an API error on whichever call hits it first.
    pub async fn connect(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("jirafrog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut client = Self {
            http,
            server: config.server_base().to_string(),
            username: config.username.clone(),
            token: config.token.clone(),
            deployment_type: String::new(),
        };

        let info: ServerInfo = client.get("serverInfo", &[]).await?;
        debug!(
            version = %info.version,
            base_url = %info.base_url,
            deployment_type = %info.deployment_type,
            "connected to Jira"
        );
        client.deployment_type = info.deployment_type;

        Ok(client)
    }

    pub async fn search(&self, jql: &str) -> Result<Vec<Issue>> {
        let resource = search_resource(&self.deployment_type);
        debug!(jql, resource, "searching issues");

        let response: SearchResponse = self
            .get(
                resource,
                &[
                    ("jql", jql),
                    ("fields", SEARCH_FIELDS),
                    ("maxResults", SEARCH_MAX_RESULTS),
                ],
            )
            .await?;

        debug!(count = response.issues.len(), "search returned");
        Ok(response.issues)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = endpoint_url(&self.server, resource)?;

        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.token))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JiraFrogError::ApiError {
                status: response.status().as_u16(),
                message: error_message(
                    &response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<failed to read response body>".to_string()),
                ),
            });
        }

        Ok(response.json().await?)
    }
}

/// Cloud only serves the token-paged `search/jql`; Server and Data Center
/// only have the classic `search`.
fn search_resource(deployment_type: &str) -> &'static str {
    if deployment_type == CLOUD_DEPLOYMENT {
        "search/jql"
    } else {
        "search"
    }
}

fn endpoint_url(server: &str, resource: &str) -> Result<Url> {
    let raw = format!("{server}/{API_PREFIX}/{resource}");
    Url::parse(&raw).map_err(|_| JiraFrogError::InvalidUrl(raw))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.summary())
        .unwrap_or_else(|| body.trim().to_string())
}
