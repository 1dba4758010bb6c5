//! Handlers for the employee-facing screens: `/profile` and `/add-biodata`.

use futures_util::try_join;
use tracing::info;

use crate::biodata::form::BiodataForm;
use crate::biodata::submission::{BatchReport, SubmissionController};
use crate::errors::PortalError;
use crate::gateway::{decode_or_default, endpoints, Gateway};
use crate::models::biodata::Profile;
use crate::notify::{Notifier, SHORT_DISMISS};
use crate::session::SessionStore;
use crate::state::AppState;

const PROFILE_FAILURE: &str = "An error occurred";

/// GET /biodata/me plus the three history lists, fetched concurrently.
pub async fn load_profile(state: &AppState) -> Result<Profile, PortalError> {
    let result = fetch_profile(state).await;
    if let Err(e) = &result {
        state
            .notifier
            .notify(e.to_notification("Error", PROFILE_FAILURE, SHORT_DISMISS));
    }
    result
}

async fn fetch_profile(state: &AppState) -> Result<Profile, PortalError> {
    let token = state.session.token().ok_or(PortalError::MissingAuth)?;
    let token = Some(token.as_str());
    let gateway = &state.gateway;

    let (biodata, education, jobs, trainings) = try_join!(
        gateway.get(endpoints::BIODATA_ME, token),
        gateway.get(endpoints::BIODATA_EDUCATION, token),
        gateway.get(endpoints::BIODATA_JOB, token),
        gateway.get(endpoints::BIODATA_TRAINING, token),
    )?;

    let profile = Profile {
        biodata: decode_or_default(biodata)?,
        education: decode_or_default(education)?,
        jobs: decode_or_default(jobs)?,
        trainings: decode_or_default(trainings)?,
    };
    info!(
        "Profile loaded ({} education, {} jobs, {} trainings)",
        profile.education.len(),
        profile.jobs.len(),
        profile.trainings.len()
    );
    Ok(profile)
}

/// Submits the add-biodata form. The view stays where it is afterwards.
pub async fn submit_biodata(
    state: &AppState,
    form: &BiodataForm,
) -> Result<BatchReport, PortalError> {
    SubmissionController::new(state).create_biodata(form).await
}
