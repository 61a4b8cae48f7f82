//! Session and flash cookies.
//!
//! Both live in the private (encrypted + authenticated) cookie jar, so clients can neither read
//! nor forge them. The session records when it was issued and is refused once older than the TTL,
//! independent of the browser honouring `Max-Age`.

use crate::types::session::{Flash, SessionContext};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::{debug, warn};

pub const SESSION_COOKIE: &str = "climbwall_session";
pub const FLASH_COOKIE: &str = "climbwall_flash";

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    session: SessionContext,
    issued_at: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub ttl: Duration,
    pub secure: bool,
}

impl SessionPolicy {
    pub fn new(ttl: Duration, insecure_cookie: bool) -> Self {
        Self {
            ttl,
            secure: !insecure_cookie,
        }
    }

    /// Anonymous -> Authenticated.
    pub fn store(&self, jar: PrivateCookieJar, session: &SessionContext) -> PrivateCookieJar {
        self.store_issued_at(jar, session, Utc::now())
    }

    pub(crate) fn store_issued_at(
        &self,
        jar: PrivateCookieJar,
        session: &SessionContext,
        issued_at: DateTime<Utc>,
    ) -> PrivateCookieJar {
        let claims = SessionClaims {
            session: session.clone(),
            issued_at: issued_at.timestamp(),
        };
        match serde_json::to_string(&claims) {
            Ok(value) => jar.add(self.build_cookie(SESSION_COOKIE, value, Some(self.ttl))),
            Err(e) => {
                warn!(error = %e, "failed to encode session");
                jar
            }
        }
    }

    /// The live session carried by `jar`, if any. Undecodable or expired sessions count as anonymous.
    pub fn load(&self, jar: &PrivateCookieJar) -> Option<SessionContext> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let claims: SessionClaims = match serde_json::from_str(cookie.value()) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "discarding undecodable session cookie");
                return None;
            }
        };

        let age = Utc::now().timestamp() - claims.issued_at;
        if !(0..=self.ttl.whole_seconds()).contains(&age) {
            debug!(user_id = claims.session.user_id, age, "session expired");
            return None;
        }
        Some(claims.session)
    }

    /// Authenticated -> Anonymous.
    pub fn clear(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(self.removal_cookie(SESSION_COOKIE))
    }

    pub fn push_flash(&self, jar: PrivateCookieJar, flash: Flash) -> PrivateCookieJar {
        match serde_json::to_string(&flash) {
            Ok(value) => jar.add(self.build_cookie(FLASH_COOKIE, value, None)),
            Err(e) => {
                warn!(error = %e, "failed to encode flash message");
                jar
            }
        }
    }

    /// Read and clear the pending flash message.
    pub fn take_flash(&self, jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
        let Some(cookie) = jar.get(FLASH_COOKIE) else {
            return (jar, None);
        };
        let flash = serde_json::from_str(cookie.value()).ok();
        (jar.remove(self.removal_cookie(FLASH_COOKIE)), flash)
    }

    fn build_cookie(&self, name: &str, value: String, max_age: Option<Duration>) -> Cookie<'static> {
        let mut builder = Cookie::build(Cookie::new(name.to_string(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);
        if let Some(max_age) = max_age {
            builder = builder.max_age(max_age);
        }
        builder.build()
    }

    fn removal_cookie(&self, name: &str) -> Cookie<'static> {
        Cookie::build(Cookie::new(name.to_string(), ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }
}
