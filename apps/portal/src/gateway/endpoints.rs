// REST paths consumed by the portal, relative to the configured base URL.

pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_LOGIN: &str = "/auth/login";

pub const BIODATA: &str = "/biodata";
pub const BIODATA_ME: &str = "/biodata/me";
pub const BIODATA_EDUCATION: &str = "/biodata/education";
pub const BIODATA_JOB: &str = "/biodata/job";
pub const BIODATA_TRAINING: &str = "/biodata/training";

pub const ADMIN_BIODATA: &str = "/admin/biodata";

pub fn admin_biodata(id: i64) -> String {
    format!("{ADMIN_BIODATA}/{id}")
}

pub fn admin_education(id: i64) -> String {
    format!("/admin/education/{id}")
}

pub fn admin_job(id: i64) -> String {
    format!("/admin/job/{id}")
}

pub fn admin_training(id: i64) -> String {
    format!("/admin/training/{id}")
}
