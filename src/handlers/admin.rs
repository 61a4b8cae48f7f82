//! Admin panel. Every handler takes [`RequireAdmin`] first, so refused visitors are redirected
//! before the request body is touched.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::error::ClimbwallError;
use crate::middleware::auth::RequireAdmin;
use crate::middleware::route_form::RouteSubmission;
use crate::middleware::route_id::RouteId;
use crate::router::ClimbState;
use crate::types::session::Flash;
use crate::types::views::AdminView;

const ADMIN_HOME: &str = "/admin";

/// GET /admin -> all routes and an empty edit form.
pub async fn admin_index(
    State(state): State<ClimbState>,
    RequireAdmin(admin): RequireAdmin,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, ClimbwallError> {
    let routes = state.routes.list().await?;
    let (jar, flash) = state.session_policy.take_flash(jar);
    Ok((jar, Json(AdminView::new(routes, None, &admin, flash))))
}

/// POST /admin/add
pub async fn add_route(
    State(state): State<ClimbState>,
    RequireAdmin(admin): RequireAdmin,
    jar: PrivateCookieJar,
    submission: RouteSubmission,
) -> Response {
    let result = state
        .routes
        .add(&admin, &submission.form, submission.image.as_ref())
        .await;
    match result {
        Ok(route) => back_to_admin(
            &state,
            jar,
            Flash::success(format!("Added route {}.", route.name)),
        ),
        Err(e @ ClimbwallError::MissingField(_)) => {
            back_to_admin(&state, jar, Flash::error(e.to_string()))
        }
        Err(e) => e.into_response(),
    }
}

/// GET /admin/edit/{id} -> the admin view with the route prefilled.
pub async fn edit_form(
    State(state): State<ClimbState>,
    RequireAdmin(admin): RequireAdmin,
    RouteId(id): RouteId,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, ClimbwallError> {
    let route_to_edit = state.routes.get(id).await?;
    let routes = state.routes.list().await?;
    let (jar, flash) = state.session_policy.take_flash(jar);
    Ok((
        jar,
        Json(AdminView::new(routes, Some(route_to_edit), &admin, flash)),
    ))
}

/// POST /admin/edit/{id}
pub async fn update_route(
    State(state): State<ClimbState>,
    RequireAdmin(admin): RequireAdmin,
    RouteId(id): RouteId,
    jar: PrivateCookieJar,
    submission: RouteSubmission,
) -> Response {
    let result = state
        .routes
        .update(&admin, id, &submission.form, submission.image.as_ref())
        .await;
    match result {
        Ok(route) => back_to_admin(
            &state,
            jar,
            Flash::success(format!("Updated route {}.", route.name)),
        ),
        Err(e) => e.into_response(),
    }
}

/// POST /admin/delete/{id}
pub async fn delete_route(
    State(state): State<ClimbState>,
    RequireAdmin(admin): RequireAdmin,
    RouteId(id): RouteId,
    jar: PrivateCookieJar,
) -> Response {
    match state.routes.delete(&admin, id).await {
        Ok(route) => back_to_admin(
            &state,
            jar,
            Flash::success(format!("Deleted route {}.", route.name)),
        ),
        Err(e) => e.into_response(),
    }
}

fn back_to_admin(state: &ClimbState, jar: PrivateCookieJar, flash: Flash) -> Response {
    let jar = state.session_policy.push_flash(jar, flash);
    (jar, Redirect::to(ADMIN_HOME)).into_response()
}
