use std::time::{Duration, Instant};

use log::info;
use tokio::time::sleep;

use crate::config::settings::PollingSettings;
use crate::domain::{PollProgress, SourceFile, Tournament};
use crate::errors::UploadError;
use crate::registry::{AsyncState, RegistryApi};

/// How the registry resolved the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Replaced,
}

/// Drives the final publish step: attach the source file, submit the
/// tournament and poll the async request until the registry is done.
pub struct Publisher<'a, R: RegistryApi> {
    registry: &'a R,
    settings: &'a PollingSettings,
}

impl<'a, R: RegistryApi + Sync> Publisher<'a, R> {
    pub fn new(registry: &'a R, settings: &'a PollingSettings) -> Self {
        Self { registry, settings }
    }

    pub async fn publish(
        &self,
        tournament: &Tournament,
        source: &SourceFile,
    ) -> Result<PublishOutcome, UploadError> {
        self.upload_source_file(source, &tournament.user_identifier).await?;
        let async_id = self.submit_tournament(tournament).await?;
        let state = self.poll_until_terminal(&async_id).await?;
        self.classify_outcome(state)
    }

    async fn upload_source_file(
        &self,
        source: &SourceFile,
        user_identifier: &str,
    ) -> Result<(), UploadError> {
        info!("  Uploading source file {}...", source.name);
        let accepted = self.registry.upload_file(source, user_identifier).await?;
        if !accepted {
            return Err(UploadError::FileRejected);
        }
        Ok(())
    }

    async fn submit_tournament(&self, tournament: &Tournament) -> Result<String, UploadError> {
        info!("  Submitting tournament for processing...");
        let accepted = self.registry.create_or_replace_tournament(tournament).await?;
        info!("  → Accepted as async request {}", accepted.async_id);
        Ok(accepted.async_id)
    }

    async fn poll_until_terminal(&self, async_id: &str) -> Result<AsyncState, UploadError> {
        let started = Instant::now();
        let mut progress = PollProgress::default();

        loop {
            let state = self.registry.async_request_state(async_id).await?;
            if state.is_terminal() {
                return Ok(state);
            }
            if let Some(fraction) = state.processing_progress() {
                if let Some(percent) = progress.record(fraction) {
                    info!("  → {percent}% done");
                }
            }
            self.check_timeout(started)?;
            sleep(Duration::from_millis(self.settings.interval_ms)).await;
        }
    }

    fn check_timeout(&self, started: Instant) -> Result<(), UploadError> {
        let Some(limit) = self.settings.timeout_secs else {
            return Ok(());
        };
        if started.elapsed() >= Duration::from_secs(limit) {
            return Err(UploadError::PublishTimeout(limit));
        }
        Ok(())
    }

    fn classify_outcome(&self, state: AsyncState) -> Result<PublishOutcome, UploadError> {
        let Some(outcome) = state.into_outcome() else {
            return Err(UploadError::PublishFailed);
        };
        info!("  → 100% done");
        match outcome.kind.as_str() {
            "create" => Ok(PublishOutcome::Created),
            "replace" => Ok(PublishOutcome::Replaced),
            _ => Err(UploadError::PublishFailed),
        }
    }
}
