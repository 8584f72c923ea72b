pub mod init;
pub mod post;
pub mod reason;
pub mod serve;
pub mod stats;

use blogd::db::Database;
use blogd::models::{Post, Reason};
use blogd::{Error, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const TITLE_WIDTH: usize = 48;

/// Open an existing database, bringing its schema up to date.
pub fn open_db(db_path: &Path) -> Result<Database> {
    if !db_path.exists() {
        return Err(Error::NotInitialized(db_path.to_path_buf()));
    }
    let db = Database::open(db_path)?;
    db.migrate()?;
    Ok(db)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    let line = s.lines().next().unwrap_or_default();
    if line.chars().count() > max || line.len() < s.len() {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "CHARS")]
    chars: usize,
}

#[derive(Tabled)]
struct ReasonRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "WHY")]
    why: String,
}

/// Print posts as a table or JSON.
pub fn print_posts(posts: &[Post], json: bool) -> Result<()> {
    if json {
        return print_json(posts);
    }
    if posts.is_empty() {
        println!("{}", "No posts found.".dimmed());
        return Ok(());
    }

    let rows = posts.iter().map(|p| PostRow {
        id: p.id.to_string(),
        created: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
        title: truncate(&p.title, TITLE_WIDTH),
        chars: p.content.chars().count(),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
    Ok(())
}

/// Print reasons as a table or JSON.
pub fn print_reasons(reasons: &[Reason], json: bool) -> Result<()> {
    if json {
        return print_json(reasons);
    }
    if reasons.is_empty() {
        println!("{}", "No reasons found.".dimmed());
        return Ok(());
    }

    let rows = reasons.iter().map(|r| ReasonRow {
        id: r.id.to_string(),
        created: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
        name: truncate(&r.name, 24),
        why: truncate(&r.why, TITLE_WIDTH),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
    Ok(())
}
