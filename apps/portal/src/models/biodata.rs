use serde::{Deserialize, Serialize};

use super::lenient;

/// The primary personal/employment record for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Biodata {
    #[serde(deserialize_with = "lenient")]
    pub position: String,
    #[serde(deserialize_with = "lenient")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient")]
    pub ktp_number: String,
    #[serde(deserialize_with = "lenient")]
    pub birth_place: String,
    #[serde(deserialize_with = "lenient")]
    pub birth_date: String,
    #[serde(deserialize_with = "lenient")]
    pub gender: String,
    #[serde(deserialize_with = "lenient")]
    pub religion: String,
    #[serde(deserialize_with = "lenient")]
    pub blood_type: String,
    #[serde(deserialize_with = "lenient")]
    pub marital_status: String,
    #[serde(deserialize_with = "lenient")]
    pub ktp_address: String,
    #[serde(deserialize_with = "lenient")]
    pub living_address: String,
    #[serde(deserialize_with = "lenient")]
    pub email: String,
    #[serde(deserialize_with = "lenient")]
    pub phone: String,
    #[serde(deserialize_with = "lenient")]
    pub emergency_contact: String,
    #[serde(deserialize_with = "lenient")]
    pub skills: String,
    #[serde(deserialize_with = "lenient")]
    pub placement_willingness: bool,
    #[serde(deserialize_with = "lenient")]
    pub expected_salary: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    /// Assigned by the backend; absent until persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub education_level: String,
    #[serde(deserialize_with = "lenient")]
    pub institution_name: String,
    #[serde(deserialize_with = "lenient")]
    pub major: String,
    #[serde(deserialize_with = "lenient")]
    pub graduation_year: i32,
    #[serde(deserialize_with = "lenient")]
    pub gpa: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobHistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub company_name: String,
    #[serde(deserialize_with = "lenient")]
    pub last_position: String,
    #[serde(deserialize_with = "lenient")]
    pub last_salary: i64,
    #[serde(deserialize_with = "lenient")]
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub course_name: String,
    #[serde(deserialize_with = "lenient")]
    pub has_certificate: bool,
    #[serde(deserialize_with = "lenient")]
    pub year: i32,
}

/// Everything shown on the self-service profile screen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Profile {
    pub biodata: Biodata,
    pub education: Vec<EducationEntry>,
    pub jobs: Vec<JobHistoryEntry>,
    pub trainings: Vec<TrainingEntry>,
}
