//! Append-only text log of admin mutations.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Debug, ThisError)]
#[error("failed to append to audit log {}: {source}", .path.display())]
pub struct AuditError {
    path: PathBuf,
    source: std::io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Added,
    Updated,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Added => "ADDED",
            AuditAction::Updated => "UPDATED",
            AuditAction::Deleted => "DELETED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub route_id: i64,
    pub route_name: String,
    pub actor_email: String,
    pub at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn now(
        action: AuditAction,
        route_id: i64,
        route_name: impl Into<String>,
        actor_email: impl Into<String>,
    ) -> Self {
        Self {
            action,
            route_id,
            route_name: route_name.into(),
            actor_email: actor_email.into(),
            at: Utc::now(),
        }
    }
}

/// `<ISO8601> <ACTION> route: <id> <name> by <email>`
impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} route: {} {} by {}",
            self.at.format("%Y-%m-%dT%H:%M:%S%.6f"),
            self.action.as_str(),
            self.route_id,
            self.route_name,
            self.actor_email
        )
    }
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for `event`. Each line goes out in a single write on an append handle.
    pub async fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let line = format!("{event}\n");
        let wrap = |source| AuditError {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(wrap)?;
        file.write_all(line.as_bytes()).await.map_err(wrap)?;
        file.flush().await.map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_line_format() {
        let event = AuditEvent {
            action: AuditAction::Deleted,
            route_id: 7,
            route_name: "Blue Line".to_string(),
            actor_email: "admin@climbwall.local".to_string(),
            at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };
        assert_eq!(
            event.to_string(),
            "2024-05-01T12:30:00.000000 DELETED route: 7 Blue Line by admin@climbwall.local"
        );
    }

    #[tokio::test]
    async fn append_adds_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("logs.txt"));

        log.append(&AuditEvent::now(AuditAction::Added, 1, "Red Crack", "a@b.c"))
            .await
            .unwrap();
        log.append(&AuditEvent::now(AuditAction::Updated, 1, "Red Crack", "a@b.c"))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" ADDED route: 1 Red Crack by a@b.c"));
        assert!(lines[1].ends_with(" UPDATED route: 1 Red Crack by a@b.c"));
    }

    #[tokio::test]
    async fn unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for appending
        let log = AuditLog::new(dir.path());
        let err = log
            .append(&AuditEvent::now(AuditAction::Added, 1, "x", "a@b.c"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to append"));
    }
}
