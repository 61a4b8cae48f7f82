//! First-boot data: sample routes for an empty wall and the default administrator.

use crate::config::Config;
use crate::db::models::RouteFields;
use crate::db::sqlite::ClimbStorage;
use crate::error::ClimbwallError;
use crate::service::auth::AuthService;
use tracing::info;

fn sample_routes() -> [RouteFields; 2] {
    [
        RouteFields {
            name: "Yellow Arete".to_string(),
            grade: "6b".to_string(),
            kind: "boulder".to_string(),
            sector: "Sector A".to_string(),
            description: Some("Short, powerful boulder on crimps.".to_string()),
            image_path: Some("/static/images/sample1.jpg".to_string()),
            video_url: Some("https://youtu.be/example1".to_string()),
        },
        RouteFields {
            name: "Blue Line".to_string(),
            grade: "5c".to_string(),
            kind: "lina".to_string(),
            sector: "Sector B".to_string(),
            description: Some("Longer technical rope route.".to_string()),
            image_path: Some("/static/images/sample2.jpg".to_string()),
            video_url: None,
        },
    ]
}

/// Seed sample routes into an empty table (when enabled) and make sure an admin exists.
pub async fn bootstrap(
    storage: &ClimbStorage,
    auth: &AuthService,
    cfg: &Config,
) -> Result<(), ClimbwallError> {
    if cfg.seed_sample_routes && storage.count_routes().await? == 0 {
        for fields in sample_routes() {
            storage.insert_route(fields, None).await?;
        }
        info!("seeded sample routes");
    }

    auth.ensure_admin(&cfg.bootstrap_admin_email, &cfg.bootstrap_admin_password)
        .await?;
    Ok(())
}
