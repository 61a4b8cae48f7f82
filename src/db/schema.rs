//! SQL DDL for initializing the route and user storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `routes.id` / `users.id` INTEGER PRIMARY KEY AUTOINCREMENT (creation order)
/// - timestamps stored as RFC3339 TEXT
/// - `routes.created_by` is a plain nullable integer, not a foreign key
/// - `users.email` UNIQUE, compared case-sensitively
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS routes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    grade TEXT NOT NULL,
    type TEXT NOT NULL, -- "boulder" / "lina"
    sector TEXT NOT NULL,
    description TEXT NULL,
    image_path TEXT NULL,
    video_url TEXT NULL,
    created_by INTEGER NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user'
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
"#;
