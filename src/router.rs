use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::sqlite::{self, ClimbStorage};
use crate::error::ClimbwallError;
use crate::handlers::{admin, auth, public};
use crate::middleware::session::SessionPolicy;
use crate::service::assets::AssetStore;
use crate::service::audit::AuditLog;
use crate::service::auth::AuthService;
use crate::service::bootstrap::bootstrap;
use crate::service::routes::RouteService;

#[derive(Clone)]
pub struct ClimbState {
    pub routes: RouteService,
    pub auth: AuthService,
    pub cookie_key: Key,
    pub session_policy: SessionPolicy,
    pub max_upload_bytes: usize,
}

impl ClimbState {
    pub fn new(storage: ClimbStorage, cfg: &Config) -> Self {
        let assets = AssetStore::new(cfg.upload_dir.clone(), cfg.upload_url_prefix.clone());
        let audit = AuditLog::new(cfg.audit_log_path.clone());
        Self {
            routes: RouteService::new(storage.clone(), assets, audit),
            auth: AuthService::new(storage),
            cookie_key: cfg.cookie_key(),
            session_policy: SessionPolicy::new(cfg.session_ttl(), cfg.insecure_cookie),
            max_upload_bytes: cfg.max_upload_bytes,
        }
    }

    /// Open the database, apply the schema and run first-boot seeding.
    pub async fn from_config(cfg: &Config) -> Result<Self, ClimbwallError> {
        let storage = sqlite::connect(&cfg.database_url()).await?;
        let state = Self::new(storage, cfg);
        bootstrap(state.routes.storage(), &state.auth, cfg).await?;
        Ok(state)
    }
}

impl FromRef<ClimbState> for Key {
    fn from_ref(state: &ClimbState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn climbwall_router(state: ClimbState) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_index))
        .route("/admin/add", post(admin::add_route))
        .route(
            "/admin/edit/{id}",
            get(admin::edit_form).post(admin::update_route),
        )
        .route("/admin/delete/{id}", post(admin::delete_route))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .route("/", get(public::index))
        .route("/routes", get(public::list_routes))
        .route("/routes/{id}", get(public::route_detail))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(auth::register_form).post(auth::register))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
