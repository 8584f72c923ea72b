use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Post, PostCreate, PostUpdate, Reason, ReasonCreate};

/// Current schema version written by `run_migrations`.
pub const SCHEMA_VERSION: i32 = 1;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(Database { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Database { conn })
    }

    /// Create the schema tables if they don't exist, then run any pending version-gated migrations.
    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS posts (
                id         TEXT PRIMARY KEY,
                title      TEXT NOT NULL,
                content    TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS reasons (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                why        TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            ",
        )?;

        // Fresh databases start at version 0.
        self.conn.execute(
            "INSERT OR IGNORE INTO config (key, value) VALUES ('schema_version', '0')",
            [],
        )?;

        run_migrations(&self.conn)
    }

    // -- Config --

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    // -- Posts --

    pub fn insert_post(&self, new: &PostCreate) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            content: new.content.clone(),
            created_at: now(),
        };
        self.conn.execute(
            "INSERT INTO posts (id, title, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                post.id.to_string(),
                post.title,
                post.content,
                format_timestamp(&post.created_at),
            ],
        )?;
        Ok(post)
    }

    pub fn get_post(&self, id: &Uuid) -> Result<Option<Post>> {
        let post = self
            .conn
            .query_row(
                "SELECT id, title, content, created_at FROM posts WHERE id = ?1",
                params![id.to_string()],
                row_to_post,
            )
            .optional()?;
        Ok(post)
    }

    /// All posts, newest first.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, created_at FROM posts
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], row_to_post)?;
        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    /// Apply the provided fields of `changes`. Returns `None` if the post does not exist.
    pub fn update_post(&self, id: &Uuid, changes: &PostUpdate) -> Result<Option<Post>> {
        let id_str = id.to_string();
        let mut sets = Vec::new();
        let mut param_values: Vec<&dyn rusqlite::types::ToSql> = Vec::new();

        if let Some(t) = &changes.title {
            sets.push(format!("title = ?{}", sets.len() + 1));
            param_values.push(t);
        }
        if let Some(c) = &changes.content {
            sets.push(format!("content = ?{}", sets.len() + 1));
            param_values.push(c);
        }

        if sets.is_empty() {
            return self.get_post(id);
        }

        let sql = format!(
            "UPDATE posts SET {} WHERE id = ?{}",
            sets.join(", "),
            sets.len() + 1
        );
        param_values.push(&id_str);

        let rows_changed = self.conn.execute(&sql, param_values.as_slice())?;
        if rows_changed == 0 {
            return Ok(None);
        }
        self.get_post(id)
    }

    /// Returns `false` when no post had that id.
    pub fn delete_post(&self, id: &Uuid) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }

    pub fn count_posts(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?)
    }

    // -- Reasons --

    pub fn insert_reason(&self, new: &ReasonCreate) -> Result<Reason> {
        let reason = Reason {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            why: new.why.clone(),
            created_at: now(),
        };
        self.conn.execute(
            "INSERT INTO reasons (id, name, why, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                reason.id.to_string(),
                reason.name,
                reason.why,
                format_timestamp(&reason.created_at),
            ],
        )?;
        Ok(reason)
    }

    /// All reasons, newest first.
    pub fn list_reasons(&self) -> Result<Vec<Reason>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, why, created_at FROM reasons
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], row_to_reason)?;
        let mut reasons = Vec::new();
        for row in rows {
            reasons.push(row?);
        }
        Ok(reasons)
    }

    pub fn get_reason(&self, id: &Uuid) -> Result<Option<Reason>> {
        let reason = self
            .conn
            .query_row(
                "SELECT id, name, why, created_at FROM reasons WHERE id = ?1",
                params![id.to_string()],
                row_to_reason,
            )
            .optional()?;
        Ok(reason)
    }

    pub fn delete_reason(&self, id: &Uuid) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM reasons WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }

    pub fn count_reasons(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM reasons", [], |row| row.get(0))?)
    }
}

/// Read the current schema version from the config table.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM config WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    match value {
        Some(v) => v
            .parse::<i32>()
            .map_err(|e| Error::Config(format!("invalid schema_version value: {e}"))),
        None => Ok(0),
    }
}

/// Run all pending schema migrations in order, each inside its own transaction.
fn run_migrations(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version < 1 {
        conn.execute_batch(
            "BEGIN;
             CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at);
             CREATE INDEX IF NOT EXISTS idx_reasons_created ON reasons(created_at);
             INSERT OR REPLACE INTO config (key, value) VALUES ('schema_version', '1');
             COMMIT;",
        )?;
    }

    Ok(())
}

/// Current time at the precision the database keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: parse_uuid_column(row, 0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_timestamp_column(row, 3)?,
    })
}

fn row_to_reason(row: &rusqlite::Row) -> rusqlite::Result<Reason> {
    Ok(Reason {
        id: parse_uuid_column(row, 0)?,
        name: row.get(1)?,
        why: row.get(2)?,
        created_at: parse_timestamp_column(row, 3)?,
    })
}
