use crate::db::models::{NewUser, Role, User};
use crate::db::sqlite::ClimbStorage;
use crate::error::ClimbwallError;
use crate::service::password;
use crate::types::session::SessionContext;
use tokio::task;
use tracing::info;

/// Credential checks and account creation.
#[derive(Clone)]
pub struct AuthService {
    storage: ClimbStorage,
}

impl AuthService {
    pub fn new(storage: ClimbStorage) -> Self {
        Self { storage }
    }

    /// Check credentials and produce the session to establish. Unknown email and wrong password
    /// fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionContext, ClimbwallError> {
        let email = email.trim();
        let password = password.trim().to_string();

        let Some(user) = self.storage.find_user_by_email(email).await? else {
            blocking(move || password::verify_dummy(&password)).await?;
            return Err(ClimbwallError::InvalidCredentials);
        };

        let digest = user.password_hash.clone();
        let matches = blocking(move || password::verify_password(&password, &digest)).await?;
        if !matches {
            return Err(ClimbwallError::InvalidCredentials);
        }

        info!(user_id = user.id, role = %user.role, "user logged in");
        Ok(SessionContext::from(&user))
    }

    /// Create a `user`-role account.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ClimbwallError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() {
            return Err(ClimbwallError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(ClimbwallError::MissingField("password"));
        }
        if self.storage.find_user_by_email(email).await?.is_some() {
            return Err(ClimbwallError::DuplicateEmail(email.to_string()));
        }

        let user = self.create_user(email, password, Role::User).await?;
        info!(user_id = user.id, "registered new user");
        Ok(user)
    }

    /// Create the bootstrap admin unless some admin already exists. Returns whether one was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, ClimbwallError> {
        if self.storage.count_admins().await? > 0 {
            return Ok(false);
        }
        let admin = self.create_user(email, password, Role::Admin).await?;
        info!(user_id = admin.id, email = %admin.email, "created bootstrap admin");
        Ok(true)
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, ClimbwallError> {
        let password = password.to_string();
        let password_hash = blocking(move || password::hash_password(&password)).await??;
        self.storage
            .insert_user(NewUser {
                email: email.to_string(),
                password_hash,
                role,
            })
            .await
    }
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ClimbwallError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| ClimbwallError::PasswordHash(format!("hashing task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::connect;
    use tempfile::TempDir;

    async fn service() -> (TempDir, AuthService) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("auth.sqlite").display());
        let storage = connect(&url).await.unwrap();
        (dir, AuthService::new(storage))
    }

    #[tokio::test]
    async fn login_reports_stored_role() {
        let (_dir, auth) = service().await;
        assert!(auth.ensure_admin("admin@climbwall.local", "admin123").await.unwrap());
        auth.register("climber@climbwall.local", "pass").await.unwrap();

        let admin = auth.login("admin@climbwall.local", "admin123").await.unwrap();
        assert_eq!(admin.role, Role::Admin);

        let user = auth.login(" climber@climbwall.local ", "pass ").await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.email, "climber@climbwall.local");
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let (_dir, auth) = service().await;
        auth.ensure_admin("admin@climbwall.local", "admin123").await.unwrap();

        assert!(matches!(
            auth.login("admin@climbwall.local", "wrong").await,
            Err(ClimbwallError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("ghost@climbwall.local", "admin123").await,
            Err(ClimbwallError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn registration_rules() {
        let (_dir, auth) = service().await;
        assert!(matches!(
            auth.register("  ", "x").await,
            Err(ClimbwallError::MissingField("email"))
        ));
        assert!(matches!(
            auth.register("a@b.c", " ").await,
            Err(ClimbwallError::MissingField("password"))
        ));

        let user = auth.register("a@b.c", "secret").await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "secret");
        assert!(matches!(
            auth.register("a@b.c", "other").await,
            Err(ClimbwallError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn bootstrap_admin_is_created_once() {
        let (_dir, auth) = service().await;
        assert!(auth.ensure_admin("admin@climbwall.local", "admin123").await.unwrap());
        assert!(!auth.ensure_admin("second@climbwall.local", "x").await.unwrap());
        assert!(matches!(
            auth.login("second@climbwall.local", "x").await,
            Err(ClimbwallError::InvalidCredentials)
        ));
    }
}
