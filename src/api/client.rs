//! HTTP client for the query service backend.
//!
//! All endpoints are POSTs under a configured base URL. Every outgoing
//! request passes through the [`RequestAuthenticator`]; the server decides
//! what an unauthenticated request may do.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::{SessionRecord, UserInfo};

use super::{ApiError, RequestAuthenticator};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Query execution includes a text-to-SQL round trip on the server, which
/// can take a while; 30s still fails fast enough for an interactive client.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/api/login";
const QUERY_PATH: &str = "/api/query";
const REGISTER_PATH: &str = "/api/register";
const FORGOT_PASSWORD_PATH: &str = "/api/forgot-password";
const SUGGESTION_PATH: &str = "/api/suggestion";

// ============================================================================
// Request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    sentence: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct SuggestionRequest<'a> {
    content: &'a str,
}

/// Result of a natural-language query: the SQL the server generated,
/// the column names, and one JSON object per row.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub sql: String,
    pub headers: Vec<String>,
    pub result: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Generic acknowledgement from endpoints that only return a message.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// API client for the query service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Authenticate and produce a fresh session record.
    ///
    /// The server returns the identity claims (token included); the login
    /// timestamp is stamped client-side, since expiry is a client concern.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionRecord> {
        let body = LoginRequest { username, password };
        let user_info: UserInfo = self.post(LOGIN_PATH, &body, &SessionRecord::default()).await?;

        Ok(SessionRecord {
            user_info: Some(user_info),
            login_time: Some(Utc::now().timestamp_millis()),
        })
    }

    /// Run a natural-language query under the given session.
    pub async fn query(&self, sentence: &str, record: &SessionRecord) -> Result<QueryResponse> {
        let body = QueryRequest { sentence };
        self.post(QUERY_PATH, &body, record).await
    }

    /// Create a new account.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<ServerMessage> {
        let body = RegisterRequest {
            username,
            password,
            email,
        };
        self.post(REGISTER_PATH, &body, &SessionRecord::default()).await
    }

    /// Start a password recovery flow for `username`.
    pub async fn forgot_password(&self, username: &str) -> Result<ServerMessage> {
        let body = ForgotPasswordRequest { username };
        self.post(FORGOT_PASSWORD_PATH, &body, &SessionRecord::default()).await
    }

    /// Submit feedback text under the given session.
    pub async fn suggestion(&self, content: &str, record: &SessionRecord) -> Result<ServerMessage> {
        let body = SuggestionRequest { content };
        self.post(SUGGESTION_PATH, &body, record).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        record: &SessionRecord,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "Sending POST request");

        let builder = self.client.post(&url).json(body);
        let response = RequestAuthenticator::decorate(builder, record)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}
