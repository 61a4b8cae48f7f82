use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{info, warn};

use crate::error::ClimbwallError;
use crate::middleware::auth::MaybeSession;
use crate::router::ClimbState;
use crate::types::forms::{LoginForm, RegisterForm};
use crate::types::session::{Flash, SessionContext};
use crate::types::views::{CurrentUser, FormView};

/// GET /login
pub async fn login_form(
    State(state): State<ClimbState>,
    MaybeSession(session): MaybeSession,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    form_view(&state, session, jar)
}

/// POST /login -> admins land on `/admin`, everyone else on `/`.
pub async fn login(
    State(state): State<ClimbState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.login(&form.email, &form.password).await {
        Ok(session) => {
            let target = if session.is_admin() { "/admin" } else { "/" };
            let jar = state.session_policy.store(jar, &session);
            let jar = state
                .session_policy
                .push_flash(jar, Flash::success("Logged in successfully."));
            (jar, Redirect::to(target)).into_response()
        }
        Err(ClimbwallError::InvalidCredentials) => {
            info!("rejected login attempt");
            rejected_form(StatusCode::UNAUTHORIZED, "Invalid email or password.")
        }
        Err(e) => e.into_response(),
    }
}

/// GET /logout
pub async fn logout(State(state): State<ClimbState>, jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = state.session_policy.clear(jar);
    let jar = state
        .session_policy
        .push_flash(jar, Flash::success("You have been logged out."));
    (jar, Redirect::to("/"))
}

/// GET /register
pub async fn register_form(
    State(state): State<ClimbState>,
    MaybeSession(session): MaybeSession,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    form_view(&state, session, jar)
}

/// POST /register -> creates a `user`-role account and sends the visitor to `/login`.
pub async fn register(
    State(state): State<ClimbState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    match state.auth.register(&form.email, &form.password).await {
        Ok(_) => {
            let jar = state
                .session_policy
                .push_flash(jar, Flash::success("Account created. You can log in now."));
            (jar, Redirect::to("/login")).into_response()
        }
        Err(ClimbwallError::MissingField(_)) => {
            rejected_form(StatusCode::BAD_REQUEST, "Enter an email and a password.")
        }
        Err(ClimbwallError::DuplicateEmail(email)) => {
            warn!(%email, "registration with taken email");
            rejected_form(StatusCode::CONFLICT, "A user with this email already exists.")
        }
        Err(e) => e.into_response(),
    }
}

fn form_view(
    state: &ClimbState,
    session: Option<SessionContext>,
    jar: PrivateCookieJar,
) -> impl IntoResponse + use<> {
    let (jar, flash) = state.session_policy.take_flash(jar);
    (
        jar,
        Json(FormView {
            current_user: CurrentUser::from_session(session.as_ref()),
            flash,
        }),
    )
}

/// Re-show the form with an error; the session is left as it was.
fn rejected_form(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(FormView {
            current_user: None,
            flash: Some(Flash::error(message)),
        }),
    )
        .into_response()
}
