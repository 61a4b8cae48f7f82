use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Route types offered by the admin form.
pub const ROUTE_KINDS: [&str; 2] = ["boulder", "lina"];

/// A climbing line or boulder problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub grade: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sector: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub video_url: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable columns of a route; `created_by` and timestamps are managed by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteFields {
    pub name: String,
    pub grade: String,
    pub kind: String,
    pub sector: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub video_url: Option<String>,
}

impl From<Route> for RouteFields {
    fn from(r: Route) -> Self {
        Self {
            name: r.name,
            grade: r.grade,
            kind: r.kind,
            sector: r.sector,
            description: r.description,
            image_path: r.image_path,
            video_url: r.video_url,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
