use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Response header carrying a refreshed bearer token.
const AUTH_TOKEN_HEADER: &str = "jwt-token";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Validation rejection whose message the remote side wants shown
    /// verbatim.
    #[error("{0}")]
    Validation(String),
    #[error("request {command} failed with status {status}")]
    Request { command: String, status: StatusCode },
    #[error("wrong login credentials")]
    WrongCredentials,
    #[error("login response did not carry an auth token")]
    MissingAuthToken,
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin JSON transport for the registry API.
///
/// Owns the connection pool, the base URL and the bearer token. The token
/// slot starts out possibly empty and is refreshed whenever a response
/// carries the auth header.
pub struct ApiTransport {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiTransport {
    pub fn new(base_url: &str, timeout_secs: u64, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(token),
        })
    }

    /// The current bearer token, if one has been supplied or captured.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn post_json<B, T>(&self, command: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.build_url(command)).json(body);
        let response = self.execute(command, request).await?;
        Ok(response.json().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, command: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.build_url(command));
        let response = self.execute(command, request).await?;
        Ok(response.json().await?)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        command: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.build_url(command)).multipart(form);
        let response = self.execute(command, request).await?;
        Ok(response.json().await?)
    }

    /// POST that stores the refreshed bearer token from the response
    /// headers before decoding the body.
    pub async fn post_json_authenticating<B, T>(&self, command: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.build_url(command)).json(body);
        let response = self.execute(command, request).await?;
        self.capture_token(&response).await?;
        Ok(response.json().await?)
    }

    /// POST whose only interesting output is the refreshed bearer token.
    pub async fn refresh_token_via<B: Serialize + Sync>(
        &self,
        command: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.client.post(self.build_url(command)).json(body);
        let response = self.execute(command, request).await?;
        self.capture_token(&response).await
    }

    // --- Helper Methods ---

    fn build_url(&self, command: &str) -> String {
        format!("{}/{}", self.base_url, command)
    }

    async fn execute(&self, command: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = self.authorize(request).await;
        let response = request.send().await?;
        Self::check_status(command, response).await
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(command: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            if let Some(message) = Self::error_message(response).await {
                return Err(ApiError::Validation(message));
            }
        }
        Err(ApiError::Request {
            command: command.to_string(),
            status,
        })
    }

    async fn error_message(response: Response) -> Option<String> {
        let body: serde_json::Value = response.json().await.ok()?;
        body.get("message")?.as_str().map(str::to_string)
    }

    async fn capture_token(&self, response: &Response) -> Result<(), ApiError> {
        let token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::MissingAuthToken)?
            .to_string();
        *self.token.write().await = Some(token);
        Ok(())
    }
}
