//! Route orchestration: record, image and audit trail kept in step.
//!
//! The database record is authoritative. Image writes/removals and audit lines are attempted
//! around it; their failures are logged here and never undo or block the record change.

use crate::db::models::Route;
use crate::db::sqlite::ClimbStorage;
use crate::error::ClimbwallError;
use crate::service::assets::{AssetStore, ImageUpload, Removal};
use crate::service::audit::{AuditAction, AuditEvent, AuditLog};
use crate::types::forms::RouteForm;
use crate::types::session::SessionContext;
use tracing::{debug, info, warn};

/// Routes shown on the landing page.
pub const FEATURED_LIMIT: i64 = 2;

#[derive(Clone)]
pub struct RouteService {
    storage: ClimbStorage,
    assets: AssetStore,
    audit: AuditLog,
}

impl RouteService {
    pub fn new(storage: ClimbStorage, assets: AssetStore, audit: AuditLog) -> Self {
        Self {
            storage,
            assets,
            audit,
        }
    }

    pub fn storage(&self) -> &ClimbStorage {
        &self.storage
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub async fn list(&self) -> Result<Vec<Route>, ClimbwallError> {
        self.storage.list_routes().await
    }

    pub async fn featured(&self) -> Result<Vec<Route>, ClimbwallError> {
        self.storage.list_featured(FEATURED_LIMIT).await
    }

    pub async fn get(&self, id: i64) -> Result<Route, ClimbwallError> {
        self.storage.get_route(id).await
    }

    pub async fn add(
        &self,
        actor: &SessionContext,
        form: &RouteForm,
        image: Option<&ImageUpload>,
    ) -> Result<Route, ClimbwallError> {
        form.validate_required()?;

        let mut fields = form.to_fields();
        fields.image_path = self.store_image(image).await;
        let image_path = fields.image_path.clone();

        let route = match self.storage.insert_route(fields, Some(actor.user_id)).await {
            Ok(route) => route,
            Err(e) => {
                self.discard_image(image_path.as_deref()).await;
                return Err(e);
            }
        };

        info!(route_id = route.id, name = %route.name, actor = %actor.email, "route added");
        self.record(AuditEvent::now(
            AuditAction::Added,
            route.id,
            &route.name,
            &actor.email,
        ))
        .await;
        Ok(route)
    }

    /// Overwrite all text fields; the image changes only when a new file was stored.
    pub async fn update(
        &self,
        actor: &SessionContext,
        id: i64,
        form: &RouteForm,
        image: Option<&ImageUpload>,
    ) -> Result<Route, ClimbwallError> {
        let existing = self.storage.get_route(id).await?;

        let mut fields = form.to_overwrite_fields();
        let new_image = self.store_image(image).await;
        fields.image_path = new_image.clone().or_else(|| existing.image_path.clone());

        let route = match self.storage.update_route(id, fields).await {
            Ok(route) => route,
            Err(e) => {
                self.discard_image(new_image.as_deref()).await;
                return Err(e);
            }
        };

        // the record no longer references the old file, unless the new one reused its name
        if new_image.is_some() && new_image != existing.image_path {
            self.discard_image(existing.image_path.as_deref()).await;
        }

        info!(route_id = route.id, name = %route.name, actor = %actor.email, "route updated");
        self.record(AuditEvent::now(
            AuditAction::Updated,
            route.id,
            &route.name,
            &actor.email,
        ))
        .await;
        Ok(route)
    }

    /// Remove the image, then the record. Returns the route as it was before deletion.
    pub async fn delete(&self, actor: &SessionContext, id: i64) -> Result<Route, ClimbwallError> {
        let route = self.storage.get_route(id).await?;

        self.discard_image(route.image_path.as_deref()).await;
        self.storage.delete_route(id).await?;

        info!(route_id = id, name = %route.name, actor = %actor.email, "route deleted");
        self.record(AuditEvent::now(
            AuditAction::Deleted,
            id,
            &route.name,
            &actor.email,
        ))
        .await;
        Ok(route)
    }

    async fn store_image(&self, image: Option<&ImageUpload>) -> Option<String> {
        let image = image?;
        match self.assets.save(image).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, file_name = %image.file_name, "image upload not stored");
                None
            }
        }
    }

    async fn discard_image(&self, url: Option<&str>) {
        let Some(url) = url else {
            return;
        };
        match self.assets.delete_if_owned(url).await {
            Ok(Removal::Removed) => debug!(url, "removed image"),
            Ok(Removal::Missing) => warn!(url, "image already missing"),
            Ok(Removal::NotOwned) => debug!(url, "image outside upload area left in place"),
            Err(e) => warn!(error = %e, url, "image not removed"),
        }
    }

    async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.audit.append(&event).await {
            warn!(error = %e, action = event.action.as_str(), route_id = event.route_id, "audit entry lost");
        }
    }
}
