//! Navigation surface and the client-side route gate.
//!
//! `guard` only decides what to show. The `isAdmin` flag it reads comes from
//! client-controlled session data, so the backend must authorize every admin
//! endpoint on its own.

use std::fmt;

use crate::models::user::SessionUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Profile,
    AddBiodata,
    AdminList,
    AdminDetail(i64),
}

impl Route {
    /// Parses a navigation path. `/` lands on the login page.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["profile"] => Some(Route::Profile),
            ["add-biodata"] => Some(Route::AddBiodata),
            ["biodata"] => Some(Route::AdminList),
            ["biodata", id] => id.parse().ok().map(Route::AdminDetail),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::AddBiodata => "/add-biodata".to_string(),
            Route::AdminList => "/biodata".to_string(),
            Route::AdminDetail(id) => format!("/biodata/{id}"),
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::AdminList | Route::AdminDetail(_))
    }

    /// Where the user lands after logging in.
    pub fn home_for(session: &SessionUser) -> Route {
        if session.is_admin() {
            Route::AdminList
        } else {
            Route::Profile
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolves the route actually shown for `requested`.
///
/// Without a session every protected route redirects to `/login`;
/// a non-admin asking for an admin route lands on `/profile`.
pub fn guard(requested: Route, session: Option<&SessionUser>) -> Route {
    match session {
        None if requested.requires_session() => Route::Login,
        Some(user) if requested.requires_admin() && !user.is_admin() => Route::Profile,
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserDescriptor;

    fn session(is_admin: bool) -> SessionUser {
        SessionUser {
            token: "t".into(),
            user: UserDescriptor {
                is_admin,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Login));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/register"), Some(Route::Register));
        assert_eq!(Route::parse("/profile/"), Some(Route::Profile));
        assert_eq!(Route::parse("/add-biodata"), Some(Route::AddBiodata));
        assert_eq!(Route::parse("/biodata"), Some(Route::AdminList));
        assert_eq!(Route::parse("/biodata/42"), Some(Route::AdminDetail(42)));
    }

    #[test]
    fn test_parse_unknown_paths() {
        assert_eq!(Route::parse("/dashboard"), None);
        assert_eq!(Route::parse("/biodata/abc"), None);
        assert_eq!(Route::parse("/biodata/1/edit"), None);
    }

    #[test]
    fn test_path_round_trip() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Profile,
            Route::AddBiodata,
            Route::AdminList,
            Route::AdminDetail(9),
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        assert_eq!(guard(Route::Profile, None), Route::Login);
        assert_eq!(guard(Route::AdminDetail(1), None), Route::Login);
        assert_eq!(guard(Route::Register, None), Route::Register);
    }

    #[test]
    fn test_non_admin_kept_out_of_admin_routes() {
        let user = session(false);
        assert_eq!(guard(Route::AdminList, Some(&user)), Route::Profile);
        assert_eq!(guard(Route::AddBiodata, Some(&user)), Route::AddBiodata);
    }

    #[test]
    fn test_admin_reaches_admin_routes() {
        let admin = session(true);
        assert_eq!(guard(Route::AdminDetail(3), Some(&admin)), Route::AdminDetail(3));
        assert_eq!(Route::home_for(&admin), Route::AdminList);
        assert_eq!(Route::home_for(&session(false)), Route::Profile);
    }
}
