use crate::db::models::{NewUser, Role, Route, RouteFields, User};
use crate::db::schema::SQLITE_INIT;
use crate::error::ClimbwallError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const ROUTE_COLUMNS: &str = "id, name, grade, type, sector, description, image_path, video_url, \
                             created_by, created_at, updated_at";

/// Open (creating if missing) the SQLite database and apply the schema.
pub async fn connect(database_url: &str) -> Result<ClimbStorage, ClimbwallError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    let storage = ClimbStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

#[derive(Clone)]
pub struct ClimbStorage {
    pool: SqlitePool,
}

impl ClimbStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ClimbwallError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// All routes in creation order.
    pub async fn list_routes(&self) -> Result<Vec<Route>, ClimbwallError> {
        let rows = sqlx::query(&format!("SELECT {ROUTE_COLUMNS} FROM routes ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_route).collect()
    }

    /// The first `limit` routes in creation order.
    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Route>, ClimbwallError> {
        let rows = sqlx::query(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes ORDER BY id LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_route).collect()
    }

    pub async fn count_routes(&self) -> Result<i64, ClimbwallError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn get_route(&self, id: i64) -> Result<Route, ClimbwallError> {
        let row = sqlx::query(&format!("SELECT {ROUTE_COLUMNS} FROM routes WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ClimbwallError::RouteNotFound(id))?;
        Self::row_to_route(row)
    }

    /// Insert a route and return it with its assigned id.
    pub async fn insert_route(
        &self,
        fields: RouteFields,
        created_by: Option<i64>,
    ) -> Result<Route, ClimbwallError> {
        let now = Utc::now().to_rfc3339();
        let id = sqlx::query(
            r#"
            INSERT INTO routes (
                name, grade, type, sector, description,
                image_path, video_url, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(fields.name)
        .bind(fields.grade)
        .bind(fields.kind)
        .bind(fields.sector)
        .bind(fields.description)
        .bind(fields.image_path)
        .bind(fields.video_url)
        .bind(created_by)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_route(id).await
    }

    /// Overwrite every writable column of the route and refresh `updated_at`.
    pub async fn update_route(
        &self,
        id: i64,
        fields: RouteFields,
    ) -> Result<Route, ClimbwallError> {
        let affected = sqlx::query(
            r#"UPDATE routes SET
                name = ?,
                grade = ?,
                type = ?,
                sector = ?,
                description = ?,
                image_path = ?,
                video_url = ?,
                updated_at = ?
              WHERE id = ?"#,
        )
        .bind(fields.name)
        .bind(fields.grade)
        .bind(fields.kind)
        .bind(fields.sector)
        .bind(fields.description)
        .bind(fields.image_path)
        .bind(fields.video_url)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(ClimbwallError::RouteNotFound(id));
        }
        self.get_route(id).await
    }

    pub async fn delete_route(&self, id: i64) -> Result<(), ClimbwallError> {
        let affected = sqlx::query("DELETE FROM routes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(ClimbwallError::RouteNotFound(id));
        }
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ClimbwallError> {
        let row = sqlx::query("SELECT id, email, password_hash, role FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    /// Insert a user; a taken email maps to `DuplicateEmail`.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, ClimbwallError> {
        let result = sqlx::query("INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?)")
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(User {
                id: done.last_insert_rowid(),
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ClimbwallError::DuplicateEmail(user.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn count_admins(&self) -> Result<i64, ClimbwallError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(Role::Admin.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_route(row: SqliteRow) -> Result<Route, ClimbwallError> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Route {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            grade: row.try_get("grade")?,
            kind: row.try_get("type")?,
            sector: row.try_get("sector")?,
            description: row.try_get("description")?,
            image_path: row.try_get("image_path")?,
            video_url: row.try_get("video_url")?,
            created_by: row.try_get("created_by")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_user(row: SqliteRow) -> Result<User, ClimbwallError> {
        let role_str: String = row.try_get("role")?;
        let role = role_str.parse().map_err(ClimbwallError::InvalidData)?;
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ClimbwallError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc))
}
