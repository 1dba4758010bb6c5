use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::biodata::form::EditForm;
use crate::biodata::submission::{DeleteOutcome, SubmissionController};
use crate::errors::PortalError;
use crate::gateway::{decode, endpoints, Gateway, GatewayError};
use crate::models::admin::{AdminUserDetail, AdminUserSummary};
use crate::notify::{Confirm, Notifier, SHORT_DISMISS};
use crate::session::SessionStore;
use crate::state::AppState;

const LIST_FAILURE: &str = "Failed to fetch users";
const DETAIL_FAILURE: &str = "Failed to fetch user data";

fn require_token(state: &AppState) -> Result<String, PortalError> {
    state.session.token().ok_or(PortalError::MissingAuth)
}

/// GET /admin/biodata
pub async fn list_users(state: &AppState) -> Result<Vec<AdminUserSummary>, PortalError> {
    match fetch_users(state).await {
        Ok(users) => {
            info!("Loaded {} users", users.len());
            Ok(users)
        }
        Err(e) => {
            state
                .notifier
                .notify(e.to_notification("Error", LIST_FAILURE, SHORT_DISMISS));
            Err(e)
        }
    }
}

async fn fetch_users(state: &AppState) -> Result<Vec<AdminUserSummary>, PortalError> {
    let token = require_token(state)?;
    let payload = state
        .gateway
        .get(endpoints::ADMIN_BIODATA, Some(&token))
        .await?;
    Ok(decode(payload)?)
}

/// A history list fetch never fails the detail view: errors and
/// non-array payloads both degrade to an empty list.
fn history<T: DeserializeOwned>(label: &str, result: Result<Value, GatewayError>) -> Vec<T> {
    match result {
        Ok(Value::Array(items)) => match decode(Value::Array(items)) {
            Ok(list) => list,
            Err(e) => {
                warn!("Unreadable {label} history: {e}");
                Vec::new()
            }
        },
        Ok(_) => Vec::new(),
        Err(e) => {
            error!("Error fetching {label} data: {e}");
            Vec::new()
        }
    }
}

/// Loads one user record and its three history lists concurrently.
pub async fn load_user(state: &AppState, id: i64) -> Result<AdminUserDetail, PortalError> {
    let result = fetch_user(state, id).await;
    if let Err(e) = &result {
        state
            .notifier
            .notify(e.to_notification("Error", DETAIL_FAILURE, SHORT_DISMISS));
    }
    result
}

async fn fetch_user(state: &AppState, id: i64) -> Result<AdminUserDetail, PortalError> {
    let token = require_token(state)?;
    let token = Some(token.as_str());
    let gateway = &state.gateway;

    let biodata_path = endpoints::admin_biodata(id);
    let education_path = endpoints::admin_education(id);
    let job_path = endpoints::admin_job(id);
    let training_path = endpoints::admin_training(id);

    let (biodata, education, jobs, trainings) = tokio::join!(
        gateway.get(&biodata_path, token),
        gateway.get(&education_path, token),
        gateway.get(&job_path, token),
        gateway.get(&training_path, token),
    );

    let mut detail: AdminUserDetail = decode(biodata?)?;
    detail.education = history("education", education);
    detail.jobs = history("job", jobs);
    detail.trainings = history("training", trainings);
    Ok(detail)
}

/// Saves all edits, then reloads the record so the view shows what the backend stored.
pub async fn update_user(state: &AppState, form: &EditForm) -> Result<AdminUserDetail, PortalError> {
    SubmissionController::new(state).update_user(form).await?;
    load_user(state, form.id).await
}

pub async fn delete_user(
    state: &AppState,
    id: i64,
    confirm: &dyn Confirm,
) -> Result<DeleteOutcome, PortalError> {
    SubmissionController::new(state).delete_user(id, confirm).await
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::biodata::form::ListKind;
    use crate::biodata::submission::UPDATE_SUCCESS;
    use crate::notify::Level;
    use crate::routes::Route;
    use crate::testing::{logged_in, MockGateway, ScriptedConfirm};

    fn detail_gateway() -> MockGateway {
        MockGateway::new()
            .respond(
                Method::GET,
                "/admin/biodata/4",
                json!({ "id": 4, "fullName": "Fajar", "birthDate": "1995-03-01T00:00:00.000Z" }),
            )
            .respond(
                Method::GET,
                "/admin/education/4",
                json!([{ "id": 1, "educationLevel": "SMA", "graduationYear": 2013 }]),
            )
            .respond(
                Method::GET,
                "/admin/job/4",
                json!({ "message": "No job history" }),
            )
            .fail(Method::GET, "/admin/training/4", 500, None)
    }

    #[tokio::test]
    async fn test_list_users() {
        let gateway = MockGateway::new().respond(
            Method::GET,
            endpoints::ADMIN_BIODATA,
            json!([
                { "id": 1, "fullName": "Alice", "birthDate": "2000-01-31T00:00:00.000Z", "position": "QA" },
                { "id": 2, "fullName": "Budi", "birthDate": "1990-05-02", "position": "Dev" }
            ]),
        );
        let h = logged_in(gateway, true);

        let users = list_users(&h.state).await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].birth_date_display(), "2000-01-31");
        assert_eq!(users[1].full_name, "Budi");
    }

    #[tokio::test]
    async fn test_list_users_failure_notifies() {
        let gateway = MockGateway::new().fail(Method::GET, endpoints::ADMIN_BIODATA, 403, None);
        let h = logged_in(gateway, true);

        assert!(list_users(&h.state).await.is_err());
        assert_eq!(h.notifier.all()[0].text, LIST_FAILURE);
    }

    #[tokio::test]
    async fn test_detail_history_failures_degrade_to_empty() {
        let h = logged_in(detail_gateway(), true);

        let detail = load_user(&h.state, 4).await.unwrap();

        assert_eq!(detail.biodata.full_name, "Fajar");
        assert_eq!(detail.education.len(), 1);
        assert!(detail.jobs.is_empty());
        assert!(detail.trainings.is_empty());
        assert!(h.notifier.all().is_empty());
        assert_eq!(h.gateway.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_detail_biodata_failure_is_an_error() {
        let gateway = MockGateway::new().fail(
            Method::GET,
            "/admin/biodata/4",
            404,
            Some("Biodata not found"),
        );
        let h = logged_in(gateway, true);

        assert!(load_user(&h.state, 4).await.is_err());
        let seen = h.notifier.all();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].text, "Biodata not found");
    }

    #[tokio::test]
    async fn test_update_then_reload() {
        let h = logged_in(detail_gateway(), true);
        let mut form = EditForm::from_detail(load_user(&h.state, 4).await.unwrap());
        form.sections
            .update_field(ListKind::Education, 0, "graduationYear", "2014")
            .unwrap();

        let refreshed = update_user(&h.state, &form).await.unwrap();

        let puts = h.gateway.calls_to(Method::PUT, "/admin/education/4");
        assert_eq!(puts.len(), 1);
        let body = puts[0].body.as_ref().unwrap();
        assert_eq!(body["EducationHistories"][0]["graduationYear"], json!(2014));
        assert_eq!(body["EducationHistories"][0]["id"], json!(1));
        assert_eq!(refreshed.biodata.full_name, "Fajar");
        let seen = h.notifier.all();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].level, Level::Success);
        assert_eq!(seen[0].text, UPDATE_SUCCESS);
    }

    #[tokio::test]
    async fn test_delete_declined_leaves_view() {
        let h = logged_in(detail_gateway(), true);
        let outcome = delete_user(&h.state, 4, &ScriptedConfirm::new(false))
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(h.gateway.calls_to(Method::DELETE, "/admin/biodata/4").is_empty());

        let outcome = delete_user(&h.state, 4, &ScriptedConfirm::new(true))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                next: Route::AdminList
            }
        );
    }
}
