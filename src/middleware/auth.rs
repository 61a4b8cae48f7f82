use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use std::convert::Infallible;
use tracing::info;

use crate::router::ClimbState;
use crate::types::session::{Flash, SessionContext};

/// Why a request was refused admin access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    Anonymous,
    NotAdmin { user_id: i64 },
}

/// Admin gate. Every mutating route operation and the admin views go through here.
pub fn require_admin(session: Option<&SessionContext>) -> Result<&SessionContext, AuthzError> {
    match session {
        None => Err(AuthzError::Anonymous),
        Some(s) if s.is_admin() => Ok(s),
        Some(s) => Err(AuthzError::NotAdmin { user_id: s.user_id }),
    }
}

/// The visitor's session, `None` when anonymous.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionContext>);

impl FromRequestParts<ClimbState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClimbState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        Ok(Self(state.session_policy.load(&jar)))
    }
}

/// Extracts an admin session or answers with a redirect to `/login` and a warning flash.
///
/// Runs before the body is read, so rejected requests never reach the route service.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub SessionContext);

impl FromRequestParts<ClimbState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClimbState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let session = state.session_policy.load(&jar);

        match require_admin(session.as_ref()) {
            Ok(admin) => Ok(Self(admin.clone())),
            Err(reason) => {
                info!(path = %parts.uri.path(), ?reason, "admin access refused");
                let jar = state
                    .session_policy
                    .push_flash(jar, Flash::warning("You must be logged in as an administrator."));
                Err((jar, Redirect::to("/login")).into_response())
            }
        }
    }
}
