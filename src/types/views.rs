//! JSON view models handed to the presentation layer.

use crate::db::models::{ROUTE_KINDS, Role, Route};
use crate::types::session::{Flash, SessionContext};
use serde::Serialize;

/// The logged-in visitor as exposed to every view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn from_session(session: Option<&SessionContext>) -> Option<Self> {
        session.map(|s| Self {
            email: s.email.clone(),
            role: s.role,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub featured_routes: Vec<Route>,
    pub current_user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct RoutesView {
    pub routes: Vec<Route>,
    pub current_user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct RouteDetailView {
    pub route: Route,
    pub current_user: Option<CurrentUser>,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub routes: Vec<Route>,
    pub route_to_edit: Option<Route>,
    pub route_kinds: &'static [&'static str],
    pub current_user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

impl AdminView {
    pub fn new(
        routes: Vec<Route>,
        route_to_edit: Option<Route>,
        session: &SessionContext,
        flash: Option<Flash>,
    ) -> Self {
        Self {
            routes,
            route_to_edit,
            route_kinds: &ROUTE_KINDS,
            current_user: CurrentUser::from_session(Some(session)),
            flash,
        }
    }
}

/// Login and registration forms.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub current_user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}
