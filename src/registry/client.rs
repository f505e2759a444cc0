use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::settings::RegistrySettings;
use crate::domain::{PlayerInfo, SourceFile, Tournament};
use crate::http::{ApiError, ApiTransport};
use crate::registry::models::{
    AsyncAccepted, AsyncState, CreatedPlayer, PlayerUpdate, SearchResponse,
};
use crate::registry::RegistryApi;

const LOGIN: &str = "login";
const LOGIN_AS: &str = "admin/loginAs";
const SEARCH_PLAYERS: &str = "searchPlayers";
const ADD_PLAYERS: &str = "addPlayers";
const UPDATE_PLAYERS: &str = "updatePlayers";
const UPLOAD_FILE: &str = "uploadFile";
const CREATE_OR_REPLACE: &str = "createOrReplaceTournament";
const ASYNC_REQUEST_STATE: &str = "getAsyncRequestState";

#[derive(Serialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginAsRequest {
    user_id: String,
}

/// Registry API client over the JSON transport.
pub struct RegistryClient {
    transport: ApiTransport,
}

impl RegistryClient {
    /// Create a client; `token` may carry a bearer credential obtained
    /// earlier, or be empty until `login` is called.
    pub fn new(settings: &RegistrySettings, token: Option<String>) -> Result<Self, ApiError> {
        let transport = ApiTransport::new(&settings.base_url, settings.timeout_secs, token)?;
        Ok(Self { transport })
    }

    /// Authenticate and return the logged-in user id. The refreshed bearer
    /// token is retained for every later request.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .transport
            .post_json_authenticating(LOGIN, &request)
            .await
            .map_err(Self::map_login_error)?;
        Ok(response.id)
    }

    /// Have an administrator continue the upload on another user's behalf.
    pub async fn login_as(&self, user_id: &str) -> Result<(), ApiError> {
        let request = LoginAsRequest {
            user_id: user_id.to_string(),
        };
        self.transport.refresh_token_via(LOGIN_AS, &request).await
    }

    /// The bearer token currently in use, for callers that want to reuse
    /// the session.
    pub async fn token(&self) -> Option<String> {
        self.transport.token().await
    }

    fn map_login_error(error: ApiError) -> ApiError {
        match error {
            ApiError::Request { status, .. } if status == StatusCode::UNAUTHORIZED => {
                ApiError::WrongCredentials
            }
            other => other,
        }
    }

    fn build_upload_form(file: &SourceFile, user_identifier: &str) -> Form {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        Form::new()
            .part("tournamentFile", part)
            .text("userIdentifier", user_identifier.to_string())
            .text("extension", file.extension.clone())
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn search_players(&self, players: &[PlayerInfo]) -> Result<SearchResponse, ApiError> {
        self.transport.post_json(SEARCH_PLAYERS, players).await
    }

    async fn add_players(&self, players: &[PlayerInfo]) -> Result<Vec<CreatedPlayer>, ApiError> {
        self.transport.post_json(ADD_PLAYERS, players).await
    }

    async fn update_players(&self, updates: &[PlayerUpdate]) -> Result<bool, ApiError> {
        self.transport.post_json(UPDATE_PLAYERS, updates).await
    }

    async fn upload_file(
        &self,
        file: &SourceFile,
        user_identifier: &str,
    ) -> Result<bool, ApiError> {
        let form = Self::build_upload_form(file, user_identifier);
        self.transport.post_multipart(UPLOAD_FILE, form).await
    }

    async fn create_or_replace_tournament(
        &self,
        tournament: &Tournament,
    ) -> Result<AsyncAccepted, ApiError> {
        self.transport.post_json(CREATE_OR_REPLACE, tournament).await
    }

    async fn async_request_state(&self, async_id: &str) -> Result<AsyncState, ApiError> {
        self.transport
            .get_json(&format!("{ASYNC_REQUEST_STATE}/{async_id}"))
            .await
    }
}
