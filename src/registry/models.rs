use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status code at and above which an asynchronous job is finished.
pub const TERMINAL_STATUS: i32 = 3;
/// Status code while the remote side is processing and reporting progress.
pub const PROCESSING_STATUS: i32 = 2;

/// Search results keyed by input index, then by registry id.
pub type SearchResponse = HashMap<usize, HashMap<i64, RegistryPlayer>>;

/// A player entry already present in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPlayer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub license_number: Option<i64>,
    /// License numbers this entry absorbed through earlier merges. A local
    /// license found here is an already-reconciled change, not a conflict.
    #[serde(default)]
    pub license_numbers_before_merge: Vec<i64>,
}

impl RegistryPlayer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Correction posted back to the registry for an existing player entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    pub id: i64,
    pub tmp_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<i64>,
}

impl PlayerUpdate {
    /// Build the update that makes an existing registry entry adopt the
    /// license number a local player carries.
    pub fn adopt_license(candidate: &RegistryPlayer, tmp_id: i64, license_number: i64) -> Self {
        Self {
            id: candidate.id,
            tmp_id,
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            birthday: candidate.birthday,
            license_number: Some(license_number),
        }
    }
}

/// One row of the create response; echoes the temporary id it was created
/// from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPlayer {
    pub id: i64,
    #[serde(default)]
    pub tmp_id: Option<i64>,
}

/// Acknowledgement of a create-or-replace submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncAccepted {
    #[serde(rename = "async-id")]
    pub async_id: String,
}

/// Snapshot of an asynchronous registry job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncState {
    #[serde(rename = "type")]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AsyncResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncResult {
    #[serde(default)]
    pub data: Option<AsyncOutcome>,
}

/// Terminal payload of a finished job; `kind` is "create" or "replace" on
/// success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncOutcome {
    #[serde(rename = "type")]
    pub kind: String,
}

impl AsyncState {
    pub fn is_terminal(&self) -> bool {
        self.status >= TERMINAL_STATUS
    }

    /// The progress fraction, only meaningful in the processing status.
    pub fn processing_progress(&self) -> Option<f64> {
        if self.status == PROCESSING_STATUS {
            self.progress
        } else {
            None
        }
    }

    pub fn into_outcome(self) -> Option<AsyncOutcome> {
        self.result.and_then(|result| result.data)
    }
}
