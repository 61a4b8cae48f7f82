//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the route/user store

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{NewUser, ROUTE_KINDS, Role, Route, RouteFields, User};
pub use schema::SQLITE_INIT;
pub use sqlite::{ClimbStorage, SqlitePool, connect};
