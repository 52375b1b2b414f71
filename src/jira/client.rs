use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::error::JiraError;
use super::types::{
    CurrentUser, Issue, SearchRequest, SearchResponse, TransitionRef, TransitionRequest,
    TransitionsResponse,
};

/// Thin, authenticated client for the Jira REST v3 endpoints the engine uses.
///
/// Holds the base URL and basic-auth credentials; every method is a single
/// blocking-from-the-caller's-view HTTP round trip with no internal retry.
pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    /// Create a client for the given Jira site (e.g. `https://acme.atlassian.net`).
    pub fn new(base_url: String, email: String, api_token: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            api_token,
        }
    }

    /// `GET /rest/api/3/myself` — identifies the authenticated account.
    ///
    /// Doubles as the credential check for `--verify`.
    pub async fn myself(&self) -> Result<CurrentUser, JiraError> {
        let url = format!("{}/rest/api/3/myself", self.base_url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("accept", "application/json")
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<CurrentUser>().await?)
    }

    /// `POST /rest/api/3/search/jql` — returns the issues matching `jql`.
    ///
    /// An empty result set is a normal outcome, not an error.
    pub async fn search(&self, jql: &str) -> Result<Vec<Issue>, JiraError> {
        let url = format!("{}/rest/api/3/search/jql", self.base_url);
        let payload = SearchRequest {
            jql: jql.to_string(),
            max_results: 10,
            fields: vec!["key".into(), "summary".into(), "status".into()],
        };
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.json::<SearchResponse>().await?;
        Ok(body.issues)
    }

    /// `GET /rest/api/3/issue/{key}/transitions` — transitions currently
    /// available on the issue (workflow-state-dependent).
    pub async fn transitions(&self, issue_key: &str) -> Result<Vec<TransitionRef>, JiraError> {
        let url = format!("{}/rest/api/3/issue/{issue_key}/transitions", self.base_url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("accept", "application/json")
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.json::<TransitionsResponse>().await?;
        Ok(body.transitions)
    }

    /// `POST /rest/api/3/issue/{key}/transitions` — executes a transition by id.
    ///
    /// Jira answers 204 No Content on success.
    pub async fn transition(&self, issue_key: &str, transition_id: &str) -> Result<(), JiraError> {
        let url = format!("{}/rest/api/3/issue/{issue_key}/transitions", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("accept", "application/json")
            .json(&TransitionRequest::new(transition_id))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `GET /rest/api/3/issue/{key}?fields=status` — current status name,
    /// used to confirm the destination after a transition.
    pub async fn current_status(&self, issue_key: &str) -> Result<Option<String>, JiraError> {
        let url = format!(
            "{}/rest/api/3/issue/{issue_key}?fields=status",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("accept", "application/json")
            .send()
            .await?;
        let response = check_status(response).await?;
        let issue = response.json::<Issue>().await?;
        Ok(issue.fields.status.map(|s| s.name))
    }
}

/// Map a non-success HTTP status to the error taxonomy, draining the body
/// for diagnostics (never the credentials).
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, JiraError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(JiraError::AuthFailed {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(JiraError::ApiError {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}
