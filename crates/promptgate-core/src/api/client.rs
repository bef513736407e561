//! API client for the prompt-filtering chat API.
//!
//! `ApiClient` owns the HTTP connection pool, the configuration, and the
//! current session token. Every endpoint wrapper funnels through [`ApiClient::call`],
//! which guarantees a session token is attached and refreshes it exactly
//! once when the server answers 401.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::auth::{Session, SessionData};
use crate::config::Config;
use crate::models::PromptSubmission;

use super::{ApiError, ApiRequest};

// ============================================================================
// Constants
// ============================================================================

/// Path of the authentication endpoint.
const AUTHENTICATE_PATH: &str = "/api/v1/authenticate";

/// Header carrying the long-lived API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Header carrying the session token.
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// A decoded JSON response body, returned to callers unmodified.
pub type JsonObject = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "authToken", default)]
    auth_token: Option<String>,
}

/// Client for the prompt-filtering chat API.
pub struct ApiClient {
    http: Client,
    config: Config,
    session: Session,
}

impl ApiClient {
    /// Create a new API client from the given configuration.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            session: Session::new(),
        })
    }

    /// Create a client from `API_HOST` / `API_KEY` in the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(Config::from_env()?)
    }

    /// The current session token, if any.
    pub async fn session_token(&self) -> Option<String> {
        self.session.token().await
    }

    /// Drop the current session token; the next call re-authenticates.
    pub async fn invalidate_session(&self) {
        self.session.invalidate().await;
    }

    /// Authenticate against the API and store the resulting session token.
    ///
    /// Returns the token exactly as issued by the server.
    pub async fn authenticate(&self) -> Result<String, ApiError> {
        let mut slot = self.session.guard().await;
        self.authenticate_locked(&mut slot).await
    }

    /// Authenticate while holding the session lock.
    async fn authenticate_locked(
        &self,
        slot: &mut Option<SessionData>,
    ) -> Result<String, ApiError> {
        // A failed authentication must not leave a stale token behind.
        *slot = None;

        let url = format!("{}{}", self.config.host, AUTHENTICATE_PATH);
        debug!(url = %url, "authenticating");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::AuthenticationFailed(format!(
                "status {}: {}",
                status,
                ApiError::truncate_body(&body)
            )));
        }

        let auth: AuthResponse = response.json().await.map_err(|e| {
            ApiError::AuthenticationFailed(format!("unreadable response: {}", e))
        })?;

        let token = auth.auth_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            ApiError::AuthenticationFailed(
                "no auth token received from authentication endpoint".to_string(),
            )
        })?;

        *slot = Some(SessionData::new(token.clone()));
        debug!("session token acquired");
        Ok(token)
    }

    /// Return the current session token, authenticating first if absent.
    async fn ensure_token(&self) -> Result<String, ApiError> {
        let mut slot = self.session.guard().await;
        if let Some(data) = slot.as_ref() {
            return Ok(data.token.clone());
        }
        self.authenticate_locked(&mut slot).await
    }

    /// Perform one logical API call with authentication guaranteed.
    ///
    /// Issues at most two HTTP requests: the original, and a single retry
    /// with a fresh token if the server answers 401. A second 401 is final.
    pub async fn call(&self, request: ApiRequest) -> Result<JsonObject, ApiError> {
        let token = self.ensure_token().await?;

        debug!(method = %request.method(), path = request.path(), "issuing API request");
        let response = self.execute(&request, &token).await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            // The token expired server-side; refresh once and retry.
            warn!(path = request.path(), "unauthorized response, re-authenticating");
            self.session.invalidate().await;
            let token = self.authenticate().await?;
            self.execute(&request, &token).await?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("not a JSON object: {}", e)))
    }

    /// Build and send one HTTP request with the credentials attached.
    async fn execute(
        &self,
        request: &ApiRequest,
        token: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.config.host, request.path());

        let mut headers = HeaderMap::new();
        for (name, value) in request.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiError::InvalidArgument(format!("invalid header name {:?}: {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ApiError::InvalidArgument(format!("invalid value for header {}: {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }
        // The credential headers always hold the gateway's current values,
        // whatever the caller supplied.
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.config.api_key).map_err(|_| {
                ApiError::InvalidArgument("API key is not a valid header value".to_string())
            })?,
        );
        headers.insert(
            AUTH_TOKEN_HEADER,
            HeaderValue::from_str(token).map_err(|_| {
                ApiError::InvalidArgument("session token is not a valid header value".to_string())
            })?,
        );

        let mut builder = self
            .http
            .request(request.method().clone(), &url)
            .headers(headers);
        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    // ========================================================================
    // Endpoint wrappers
    // ========================================================================

    /// Fetch the filters applied to the calling account.
    pub async fn fetch_filters(&self) -> Result<JsonObject, ApiError> {
        self.call(ApiRequest::get("/api/v1/filters")).await
    }

    /// Fetch the models available to the calling account.
    pub async fn fetch_models(&self) -> Result<JsonObject, ApiError> {
        self.call(ApiRequest::get("/api/v1/models")).await
    }

    /// Create a new chat session with the given name.
    pub async fn create_session(&self, session_name: &str) -> Result<JsonObject, ApiError> {
        let session_name = require_non_empty("sessionName", session_name)?;
        self.call(
            ApiRequest::post("/api/v1/session/create")
                .json(serde_json::json!({ "sessionName": session_name })),
        )
        .await
    }

    /// Delete an existing chat session.
    pub async fn delete_session(&self, session_id: &str) -> Result<JsonObject, ApiError> {
        let session_id = require_non_empty("sessionId", session_id)?;
        self.call(
            ApiRequest::post("/api/v1/session/delete")
                .json(serde_json::json!({ "sessionId": session_id })),
        )
        .await
    }

    /// Rename an existing chat session.
    pub async fn rename_session(
        &self,
        session_id: &str,
        new_name: &str,
    ) -> Result<JsonObject, ApiError> {
        let session_id = require_non_empty("sessionId", session_id)?;
        let new_name = require_non_empty("newName", new_name)?;
        self.call(
            ApiRequest::post("/api/v1/session/rename")
                .json(serde_json::json!({ "sessionId": session_id, "newName": new_name })),
        )
        .await
    }

    /// Fetch token usage for the calling account.
    pub async fn token_usage(&self) -> Result<JsonObject, ApiError> {
        self.call(ApiRequest::get("/api/v1/tokens")).await
    }

    /// Run the account's filters over a piece of text.
    pub async fn filter_text(&self, text: &str) -> Result<JsonObject, ApiError> {
        let text = require_non_empty("text", text)?;
        self.call(ApiRequest::post("/api/v1/filterText").json(serde_json::json!({ "text": text })))
            .await
    }

    /// Submit a prompt to a chat session.
    pub async fn submit_prompt(&self, prompt: &PromptSubmission) -> Result<JsonObject, ApiError> {
        prompt.validate()?;
        let body = serde_json::to_value(prompt).map_err(|e| {
            ApiError::InvalidArgument(format!("unserializable prompt: {}", e))
        })?;
        self.call(ApiRequest::post("/api/v1/submitPrompt").json(body))
            .await
    }
}

/// Reject empty or whitespace-only string arguments before any network call.
pub(crate) fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidArgument(format!(
            "{} must be a non-empty string",
            field
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        let config = Config::new("https://api.example.com", "test-api-key").unwrap();
        ApiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn wrappers_reject_empty_arguments_before_any_network_call() {
        let client = test_client();

        // An InvalidArgument here proves the request never left the client;
        // a network attempt against this host could only produce Network or
        // RequestFailed.
        assert!(matches!(
            client.create_session("").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.create_session("   ").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.delete_session("").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.rename_session("", "New Name").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.rename_session("sess-1", "").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.filter_text("").await,
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn submit_prompt_rejects_invalid_submissions() {
        let client = test_client();

        let mut prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        prompt.message.clear();
        assert!(matches!(
            client.submit_prompt(&prompt).await,
            Err(ApiError::InvalidArgument(_))
        ));

        let mut prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        prompt.model.clear();
        assert!(matches!(
            client.submit_prompt(&prompt).await,
            Err(ApiError::InvalidArgument(_))
        ));

        let mut prompt = PromptSubmission::for_session_id("sess-1", "hello", "small-1");
        prompt.session.clear();
        assert!(matches!(
            client.submit_prompt(&prompt).await,
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn require_non_empty_passes_values_through_untouched() {
        assert_eq!(require_non_empty("text", "hello").unwrap(), "hello");
        // Leading/trailing whitespace is preserved; only all-whitespace fails.
        assert_eq!(require_non_empty("text", " hi ").unwrap(), " hi ");
        assert!(require_non_empty("text", "\t\n").is_err());
    }
}
