use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Year the vendor format emits when a birthday is unknown.
const PLACEHOLDER_YEAR: i32 = 1900;
/// Year placeholder birthdays are moved to, keeping them clearly synthetic.
const NORMALIZED_YEAR: i32 = 1902;

/// A tournament participant before registry reconciliation.
///
/// The temporary id is assigned by the decoder and is unique within one
/// tournament; it never changes. Name, birthday and license number may all
/// be missing until enrichment fills them in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub tmp_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<i64>,
}

impl PlayerInfo {
    /// Assign a birthday, moving vendor placeholder dates off the
    /// placeholder year.
    pub fn set_birthday(&mut self, birthday: NaiveDate) {
        self.birthday = Some(normalize_birthday(birthday));
    }

    /// Whether the record carries everything the registry needs to create
    /// a new entry from it.
    pub fn has_full_identity(&self) -> bool {
        self.first_name.is_some() && self.last_name.is_some() && self.birthday.is_some()
    }

    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            _ => None,
        }
    }

    /// Human-readable form used in error messages: "First Last(license)",
    /// or whichever of the two parts is known.
    pub fn display(&self) -> String {
        let mut result = self.full_name().unwrap_or_default();
        if let Some(license) = self.license_number {
            if result.is_empty() {
                result = license.to_string();
            } else {
                result = format!("{result}({license})");
            }
        }
        result
    }
}

/// Move dates in the placeholder year forward by two years; other dates
/// pass through unchanged.
pub fn normalize_birthday(birthday: NaiveDate) -> NaiveDate {
    if birthday.year() == PLACEHOLDER_YEAR {
        birthday.with_year(NORMALIZED_YEAR).unwrap_or(birthday)
    } else {
        birthday
    }
}
