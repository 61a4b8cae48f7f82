use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::path::PathBuf;

/// Runtime configuration.
///
/// Layered as defaults <- raw env (`DB_NAME`, `DATABASE_URL`, `SECRET_KEY`) <- `CLIMBWALL_*` env.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub loglevel: String,
    pub db_name: String,
    pub database_url: Option<String>,
    pub secret_key: String,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
    pub audit_log_path: PathBuf,
    pub session_ttl_minutes: i64,
    pub max_upload_bytes: usize,
    pub insecure_cookie: bool,
    pub seed_sample_routes: bool,
    pub bootstrap_admin_email: String,
    pub bootstrap_admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            loglevel: "info".to_string(),
            db_name: "climbwall".to_string(),
            database_url: None,
            secret_key: "dev-secret-key-change-me".to_string(),
            upload_dir: PathBuf::from("static/uploads"),
            upload_url_prefix: "/static/uploads/".to_string(),
            audit_log_path: PathBuf::from("logs.txt"),
            session_ttl_minutes: 12 * 60,
            max_upload_bytes: 16 * 1024 * 1024,
            insecure_cookie: false,
            seed_sample_routes: true,
            bootstrap_admin_email: "admin@climbwall.local".to_string(),
            bootstrap_admin_password: "admin123".to_string(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&["db_name", "database_url", "secret_key"]))
            .merge(Env::prefixed("CLIMBWALL_"))
    }

    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment().extract().map_err(Box::new)
    }

    /// SQLite URL; an explicit `DATABASE_URL` wins over the `DB_NAME` derived file.
    pub fn database_url(&self) -> String {
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("sqlite:{}.sqlite", self.db_name),
        }
    }

    /// Stretch the configured secret into the 64-byte master key used for private cookies.
    pub fn cookie_key(&self) -> Key {
        let digest = Sha512::digest(self.secret_key.as_bytes());
        Key::from(digest.as_slice())
    }

    pub fn session_ttl(&self) -> time::Duration {
        time::Duration::minutes(self.session_ttl_minutes.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_bootstrap_values() {
        let cfg = Config::default();
        assert_eq!(cfg.bootstrap_admin_email, "admin@climbwall.local");
        assert_eq!(cfg.upload_url_prefix, "/static/uploads/");
        assert_eq!(cfg.database_url(), "sqlite:climbwall.sqlite");
    }

    #[test]
    fn env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_NAME", "gym");
            jail.set_env("SECRET_KEY", "s3cret");
            jail.set_env("CLIMBWALL_SESSION_TTL_MINUTES", "30");
            jail.set_env("CLIMBWALL_UPLOAD_DIR", "/var/uploads");

            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.database_url(), "sqlite:gym.sqlite");
            assert_eq!(cfg.secret_key, "s3cret");
            assert_eq!(cfg.session_ttl_minutes, 30);
            assert_eq!(cfg.upload_dir, PathBuf::from("/var/uploads"));
            Ok(())
        });
    }

    #[test]
    fn explicit_database_url_wins() {
        let cfg = Config {
            database_url: Some("sqlite::memory:".to_string()),
            ..Config::default()
        };
        assert_eq!(cfg.database_url(), "sqlite::memory:");
    }

    #[test]
    fn cookie_key_is_stable_per_secret() {
        let a = Config::default().cookie_key();
        let b = Config::default().cookie_key();
        let c = Config {
            secret_key: "other".to_string(),
            ..Config::default()
        };
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.cookie_key().master());
    }
}
