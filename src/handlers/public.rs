use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::error::ClimbwallError;
use crate::middleware::auth::MaybeSession;
use crate::middleware::route_id::RouteId;
use crate::router::ClimbState;
use crate::types::views::{CurrentUser, IndexView, RouteDetailView, RoutesView};

/// GET / -> landing page with the featured routes.
pub async fn index(
    State(state): State<ClimbState>,
    MaybeSession(session): MaybeSession,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, ClimbwallError> {
    let featured_routes = state.routes.featured().await?;
    let (jar, flash) = state.session_policy.take_flash(jar);
    Ok((
        jar,
        Json(IndexView {
            featured_routes,
            current_user: CurrentUser::from_session(session.as_ref()),
            flash,
        }),
    ))
}

/// GET /routes
pub async fn list_routes(
    State(state): State<ClimbState>,
    MaybeSession(session): MaybeSession,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, ClimbwallError> {
    let routes = state.routes.list().await?;
    let (jar, flash) = state.session_policy.take_flash(jar);
    Ok((
        jar,
        Json(RoutesView {
            routes,
            current_user: CurrentUser::from_session(session.as_ref()),
            flash,
        }),
    ))
}

/// GET /routes/{id} -> 404 when the route does not exist.
pub async fn route_detail(
    State(state): State<ClimbState>,
    MaybeSession(session): MaybeSession,
    RouteId(id): RouteId,
) -> Result<Json<RouteDetailView>, ClimbwallError> {
    let route = state.routes.get(id).await?;
    Ok(Json(RouteDetailView {
        route,
        current_user: CurrentUser::from_session(session.as_ref()),
    }))
}
