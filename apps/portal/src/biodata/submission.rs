//! Aggregate Submission Controller: turns form state into a batch of remote writes.
//!
//! Flow (create): token check → POST parent → fan out one POST per history entry →
//!                join on all → exactly one notification.
//! Flow (update): token check → four concurrent PUTs → join on all → one notification.
//!
//! Writes within a batch are independent remote records. A failed batch is NOT rolled
//! back: writes the backend already accepted stay, and the user sees one aggregate error.

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use crate::biodata::form::{BiodataForm, EditForm};
use crate::errors::{PortalError, GENERIC_MESSAGE};
use crate::gateway::{endpoints, Gateway, GatewayError};
use crate::notify::{
    Confirm, ConfirmPrompt, Notification, Notifier, SHORT_DISMISS, SUBMISSION_ERROR_DISMISS,
};
use crate::routes::Route;
use crate::session::SessionStore;
use crate::state::AppState;

pub const CREATE_SUCCESS: &str = "Biodata submitted successfully!";
pub const UPDATE_SUCCESS: &str = "All user data updated successfully";
pub const UPDATE_FAILURE: &str = "Failed to update user data";
pub const DELETE_SUCCESS: &str = "User data has been deleted.";
pub const DELETE_FAILURE: &str = "Failed to delete user";

/// Summary of a fully successful batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Remote writes issued and accepted, parent record included.
    pub dispatched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted { next: Route },
}

struct RemoteWrite {
    method: Method,
    path: String,
    body: Value,
}

impl RemoteWrite {
    fn post(path: &str, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.to_string(),
            body,
        }
    }
}

pub struct SubmissionController {
    gateway: Arc<dyn Gateway>,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionController {
    pub fn new(state: &AppState) -> Self {
        Self {
            gateway: Arc::clone(&state.gateway),
            session: Arc::clone(&state.session),
            notifier: Arc::clone(&state.notifier),
        }
    }

    fn require_token(&self) -> Result<String, PortalError> {
        self.session.token().ok_or(PortalError::MissingAuth)
    }

    /// Creates a new biodata record and all of its history entries.
    pub async fn create_biodata(&self, form: &BiodataForm) -> Result<BatchReport, PortalError> {
        match self.run_create(form).await {
            Ok(report) => {
                info!("Biodata batch accepted ({} writes)", report.dispatched);
                self.notifier
                    .notify(Notification::success("Success", CREATE_SUCCESS, SHORT_DISMISS));
                Ok(report)
            }
            Err(err) => {
                let notification = match &err {
                    PortalError::MissingAuth => {
                        err.to_notification("Error", GENERIC_MESSAGE, SHORT_DISMISS)
                    }
                    _ => err.to_notification(
                        "Submission Error",
                        GENERIC_MESSAGE,
                        SUBMISSION_ERROR_DISMISS,
                    ),
                };
                self.notifier.notify(notification);
                Err(err)
            }
        }
    }

    async fn run_create(&self, form: &BiodataForm) -> Result<BatchReport, PortalError> {
        let token = self.require_token()?;

        let parent = serde_json::to_value(&form.biodata)?;
        self.gateway
            .post(endpoints::BIODATA, &parent, Some(&token))
            .await?;

        let sections = &form.sections;
        let mut writes = Vec::with_capacity(sections.total_entries());
        for entry in sections.education() {
            writes.push(RemoteWrite::post(
                endpoints::BIODATA_EDUCATION,
                serde_json::to_value(entry.as_ref())?,
            ));
        }
        for entry in sections.jobs() {
            writes.push(RemoteWrite::post(
                endpoints::BIODATA_JOB,
                serde_json::to_value(entry.as_ref())?,
            ));
        }
        for entry in sections.trainings() {
            writes.push(RemoteWrite::post(
                endpoints::BIODATA_TRAINING,
                serde_json::to_value(entry.as_ref())?,
            ));
        }

        let report = self.fan_out(&writes, &token).await?;
        Ok(BatchReport {
            dispatched: report.dispatched + 1,
        })
    }

    /// Pushes every edit of one user back to the four admin endpoints.
    pub async fn update_user(&self, form: &EditForm) -> Result<BatchReport, PortalError> {
        match self.run_update(form).await {
            Ok(report) => {
                info!("User {} updated ({} writes)", form.id, report.dispatched);
                self.notifier
                    .notify(Notification::success("Success", UPDATE_SUCCESS, SHORT_DISMISS));
                Ok(report)
            }
            Err(err) => {
                self.notifier
                    .notify(err.to_notification("Error", UPDATE_FAILURE, SHORT_DISMISS));
                Err(err)
            }
        }
    }

    async fn run_update(&self, form: &EditForm) -> Result<BatchReport, PortalError> {
        let token = self.require_token()?;
        // Every admin update endpoint receives the whole edited record.
        let body = serde_json::to_value(form.to_detail())?;
        let writes: Vec<RemoteWrite> = [
            endpoints::admin_biodata(form.id),
            endpoints::admin_education(form.id),
            endpoints::admin_job(form.id),
            endpoints::admin_training(form.id),
        ]
        .into_iter()
        .map(|path| RemoteWrite {
            method: Method::PUT,
            path,
            body: body.clone(),
        })
        .collect();

        self.fan_out(&writes, &token).await
    }

    /// Deletes a user record after an explicit yes from `confirm`.
    /// Without a session the prompt is never shown.
    pub async fn delete_user(
        &self,
        id: i64,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, PortalError> {
        let token = match self.require_token() {
            Ok(token) => token,
            Err(err) => {
                self.notifier
                    .notify(err.to_notification("Error", DELETE_FAILURE, SHORT_DISMISS));
                return Err(err);
            }
        };

        let prompt = ConfirmPrompt {
            title: "Are you sure?".to_string(),
            text: "You will not be able to recover this user data!".to_string(),
            confirm_label: "Yes, delete it!".to_string(),
            cancel_label: "No, keep it".to_string(),
        };
        if !confirm.confirm(&prompt) {
            info!("Delete of user {id} declined");
            return Ok(DeleteOutcome::Declined);
        }

        match self
            .gateway
            .delete(&endpoints::admin_biodata(id), Some(&token))
            .await
        {
            Ok(_) => {
                info!("User {id} deleted");
                self.notifier
                    .notify(Notification::success("Deleted!", DELETE_SUCCESS, SHORT_DISMISS));
                Ok(DeleteOutcome::Deleted {
                    next: Route::AdminList,
                })
            }
            Err(e) => {
                let err = PortalError::from(e);
                self.notifier
                    .notify(err.to_notification("Error", DELETE_FAILURE, SHORT_DISMISS));
                Err(err)
            }
        }
    }

    /// Dispatches all writes concurrently and waits for every one of them.
    /// The first failure to complete becomes the batch error.
    async fn fan_out(&self, writes: &[RemoteWrite], token: &str) -> Result<BatchReport, PortalError> {
        let total = writes.len();
        info!("Dispatching {total} writes concurrently");

        let mut pending: FuturesUnordered<_> = writes
            .iter()
            .map(|write| async move {
                let result = self
                    .gateway
                    .request(write.method.clone(), &write.path, Some(&write.body), Some(token))
                    .await;
                (write, result)
            })
            .collect();

        let mut failed = 0;
        let mut first: Option<GatewayError> = None;
        while let Some((write, result)) = pending.next().await {
            if let Err(e) = result {
                warn!("{} {} failed: {e}", write.method, write.path);
                failed += 1;
                first.get_or_insert(e);
            }
        }

        match first {
            Some(first) => Err(PortalError::PartialBatch {
                failed,
                total,
                first,
            }),
            None => Ok(BatchReport { dispatched: total }),
        }
    }
}
