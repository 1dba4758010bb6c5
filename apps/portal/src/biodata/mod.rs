// Employee self-service: biodata intake form and profile view.

pub mod form;
pub mod handlers;
pub mod submission;
