mod snapshot;

pub use snapshot::HttpReferenceDatabase;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity fields the reference database may know for a license number.
/// Each field is individually optional; a missing field is not the same as
/// an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

/// Secondary lookup for players the registry does not know yet.
#[async_trait]
pub trait ReferenceDatabase {
    /// Fetch known identity fields for the given license numbers. Licenses
    /// the database does not know are simply absent from the result.
    async fn lookup(&self, licenses: &[i64]) -> Result<HashMap<i64, ReferenceEntry>>;
}
