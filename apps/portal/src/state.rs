use std::sync::Arc;

use crate::gateway::Gateway;
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Shared context injected into every handler.
/// Handlers reach the backend, the session and the user only through these seams.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub session: Arc<dyn SessionStore>,
    pub notifier: Arc<dyn Notifier>,
}
