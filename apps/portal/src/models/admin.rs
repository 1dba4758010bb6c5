use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::biodata::{Biodata, EducationEntry, JobHistoryEntry, TrainingEntry};
use super::lenient;

/// One row of the administrator user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub position: String,
}

impl AdminUserSummary {
    /// Birth date without its time component: `2000-01-31T00:00:00.000Z` → `2000-01-31`.
    pub fn birth_date_display(&self) -> String {
        display_date(&self.birth_date)
    }
}

pub fn display_date(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.to_string();
    }
    raw.split('T').next().unwrap_or(raw).to_string()
}

/// Full user record as the admin detail endpoints return it.
/// History lists are filled from their own endpoints and sent back on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminUserDetail {
    pub id: i64,
    #[serde(flatten)]
    pub biodata: Biodata,
    #[serde(rename = "EducationHistories", default)]
    pub education: Vec<EducationEntry>,
    #[serde(rename = "JobHistories", default)]
    pub jobs: Vec<JobHistoryEntry>,
    #[serde(rename = "TrainingHistories", default)]
    pub trainings: Vec<TrainingEntry>,
}
