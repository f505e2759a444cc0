pub mod client;
pub mod models;

pub use client::RegistryClient;
pub use models::*;

use async_trait::async_trait;

use crate::domain::{PlayerInfo, SourceFile, Tournament};
use crate::http::ApiError;

/// Remote operations the upload pipeline needs from the player registry.
///
/// The pipeline only talks to this trait so tests can script the registry's
/// behavior without a server.
#[async_trait]
pub trait RegistryApi {
    async fn search_players(&self, players: &[PlayerInfo]) -> Result<SearchResponse, ApiError>;

    async fn add_players(&self, players: &[PlayerInfo]) -> Result<Vec<CreatedPlayer>, ApiError>;

    async fn update_players(&self, updates: &[PlayerUpdate]) -> Result<bool, ApiError>;

    async fn upload_file(&self, file: &SourceFile, user_identifier: &str)
    -> Result<bool, ApiError>;

    async fn create_or_replace_tournament(
        &self,
        tournament: &Tournament,
    ) -> Result<AsyncAccepted, ApiError>;

    async fn async_request_state(&self, async_id: &str) -> Result<AsyncState, ApiError>;
}
