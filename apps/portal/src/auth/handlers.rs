use tracing::info;

use crate::errors::PortalError;
use crate::gateway::{decode, decode_or_default, endpoints, Gateway};
use crate::models::user::{Credentials, LoginResponse, MessageResponse, SessionUser};
use crate::notify::{Notification, Notifier, LOGIN_DISMISS};
use crate::routes::Route;
use crate::session::SessionStore;
use crate::state::AppState;

const LOGIN_FAILURE: &str = "Invalid email or password";
const REGISTER_FAILURE: &str = "An error occurred";
const REGISTER_SUCCESS: &str = "User registered successfully";

fn validate(credentials: &Credentials) -> Result<(), PortalError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(PortalError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// POST /auth/register. Returns the route to show next (`/login`).
pub async fn register(state: &AppState, credentials: &Credentials) -> Result<Route, PortalError> {
    match attempt_register(state, credentials).await {
        Ok(message) => {
            info!("Registered {}", credentials.email);
            state
                .notifier
                .notify(Notification::success("Success", message, LOGIN_DISMISS));
            Ok(Route::Login)
        }
        Err(e) => {
            state
                .notifier
                .notify(e.to_notification("Error", REGISTER_FAILURE, LOGIN_DISMISS));
            Err(e)
        }
    }
}

async fn attempt_register(state: &AppState, credentials: &Credentials) -> Result<String, PortalError> {
    validate(credentials)?;
    let body = serde_json::to_value(credentials)?;
    let payload = state
        .gateway
        .post(endpoints::AUTH_REGISTER, &body, None)
        .await?;
    let response: MessageResponse = decode_or_default(payload)?;
    Ok(response
        .message
        .unwrap_or_else(|| REGISTER_SUCCESS.to_string()))
}

/// POST /auth/login. Stores the session and returns the landing route for the user's role.
pub async fn login(state: &AppState, credentials: &Credentials) -> Result<Route, PortalError> {
    match attempt_login(state, credentials).await {
        Ok(session) => {
            info!("Logged in (admin: {})", session.is_admin());
            state
                .notifier
                .notify(Notification::success("Success", "Login successful", LOGIN_DISMISS));
            Ok(Route::home_for(&session))
        }
        Err(e) => {
            state
                .notifier
                .notify(e.to_notification("Error", LOGIN_FAILURE, LOGIN_DISMISS));
            Err(e)
        }
    }
}

async fn attempt_login(state: &AppState, credentials: &Credentials) -> Result<SessionUser, PortalError> {
    validate(credentials)?;
    let body = serde_json::to_value(credentials)?;
    let payload = state.gateway.post(endpoints::AUTH_LOGIN, &body, None).await?;
    let response: LoginResponse = decode(payload)?;
    state
        .session
        .set_session(&response.access_token, &response.user)?;
    Ok(SessionUser {
        token: response.access_token,
        user: response.user,
    })
}

/// Drops the stored session. No server call is made.
pub fn logout(state: &AppState) -> Result<Route, PortalError> {
    state.session.clear_session()?;
    info!("Logged out");
    Ok(Route::Login)
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::notify::Level;
    use crate::testing::{logged_in, logged_out, MockGateway};

    fn creds() -> Credentials {
        Credentials {
            email: "hr@corp.id".into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_admin_login_lands_on_user_list() {
        let gateway = MockGateway::new().respond(
            Method::POST,
            endpoints::AUTH_LOGIN,
            json!({
                "access_token": "fresh",
                "user": { "id": 1, "isAdmin": true },
                "message": "Login successful"
            }),
        );
        let h = logged_out(gateway);

        let next = login(&h.state, &creds()).await.unwrap();

        assert_eq!(next, Route::AdminList);
        assert_eq!(h.state.session.token().as_deref(), Some("fresh"));
        assert!(h.state.session.user().unwrap().is_admin);
        let calls = h.gateway.calls();
        assert_eq!(calls[0].token, None);
        assert_eq!(calls[0].body.as_ref().unwrap()["email"], "hr@corp.id");
        let seen = h.notifier.all();
        assert_eq!(seen[0].level, Level::Success);
        assert_eq!(seen[0].dismiss_after, Some(LOGIN_DISMISS));
    }

    #[tokio::test]
    async fn test_employee_login_lands_on_profile() {
        let gateway = MockGateway::new().respond(
            Method::POST,
            endpoints::AUTH_LOGIN,
            json!({ "access_token": "t", "user": { "isAdmin": false } }),
        );
        let h = logged_out(gateway);
        assert_eq!(login(&h.state, &creds()).await.unwrap(), Route::Profile);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_session_empty() {
        let gateway = MockGateway::new().fail(Method::POST, endpoints::AUTH_LOGIN, 401, None);
        let h = logged_out(gateway);

        assert!(login(&h.state, &creds()).await.is_err());
        assert!(h.state.session.token().is_none());
        assert_eq!(h.notifier.all()[0].text, LOGIN_FAILURE);
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        let h = logged_out(MockGateway::new());
        let blank = Credentials {
            email: " ".into(),
            password: String::new(),
        };
        let err = login(&h.state, &blank).await.unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert!(h.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_surfaces_server_messages() {
        let gateway = MockGateway::new().respond(
            Method::POST,
            endpoints::AUTH_REGISTER,
            json!({ "message": "User registered successfully" }),
        );
        let h = logged_out(gateway);
        assert_eq!(register(&h.state, &creds()).await.unwrap(), Route::Login);
        assert_eq!(h.notifier.all()[0].text, "User registered successfully");

        let gateway = MockGateway::new().fail(
            Method::POST,
            endpoints::AUTH_REGISTER,
            400,
            Some("Email already registered"),
        );
        let h = logged_out(gateway);
        assert!(register(&h.state, &creds()).await.is_err());
        assert_eq!(h.notifier.all()[0].text, "Email already registered");
    }

    #[test]
    fn test_logout_clears_session() {
        let h = logged_in(MockGateway::new(), true);
        assert_eq!(logout(&h.state).unwrap(), Route::Login);
        assert!(h.state.session.session_user().is_none());
    }
}
