use std::path::Path;

use blogd::models::{POST, PostCreate, PostUpdate, parse_id};
use blogd::{Error, Result};
use colored::Colorize;

use super::{open_db, print_json, print_posts};

/// Body text from `--content`, else from `--file`.
fn read_body(content: Option<&str>, file: Option<&Path>) -> Result<Option<String>> {
    match (content, file) {
        (Some(text), _) => Ok(Some(text.to_string())),
        (None, Some(path)) => Ok(Some(std::fs::read_to_string(path)?)),
        (None, None) => Ok(None),
    }
}

fn missing(id: &uuid::Uuid) -> Error {
    Error::NotFound {
        kind: POST,
        id: id.to_string(),
    }
}

pub fn list(db_path: &Path, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    print_posts(&db.list_posts()?, json)
}

pub fn show(db_path: &Path, raw_id: &str, json: bool) -> Result<()> {
    let id = parse_id(POST, raw_id)?;
    let db = open_db(db_path)?;
    let post = db.get_post(&id)?.ok_or_else(|| missing(&id))?;

    if json {
        return print_json(&post);
    }

    println!("ID:      {}", post.id);
    println!("Title:   {}", post.title.bold());
    println!("Created: {}", post.created_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", post.content);
    Ok(())
}

pub fn create(
    db_path: &Path,
    title: &str,
    content: Option<&str>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let body = read_body(content, file)?.unwrap_or_default();
    let db = open_db(db_path)?;
    let post = db.insert_post(&PostCreate {
        title: title.to_string(),
        content: body,
    })?;

    if json {
        print_json(&post)
    } else {
        println!("{} post {}: {}", "Created".green(), post.id, post.title);
        Ok(())
    }
}

pub fn update(
    db_path: &Path,
    raw_id: &str,
    title: Option<&str>,
    content: Option<&str>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let id = parse_id(POST, raw_id)?;
    let changes = PostUpdate {
        title: title.map(str::to_string),
        content: read_body(content, file)?,
    };
    let db = open_db(db_path)?;
    let post = db.update_post(&id, &changes)?.ok_or_else(|| missing(&id))?;

    if json {
        print_json(&post)
    } else if changes.is_empty() {
        println!("Nothing to update for post {id}");
        Ok(())
    } else {
        println!("{} post {id}", "Updated".green());
        Ok(())
    }
}

pub fn delete(db_path: &Path, raw_id: &str, json: bool) -> Result<()> {
    let id = parse_id(POST, raw_id)?;
    let db = open_db(db_path)?;
    if !db.delete_post(&id)? {
        return Err(missing(&id));
    }

    if json {
        print_json(&serde_json::json!({ "deleted": id }))
    } else {
        println!("{} post {id}", "Deleted".red());
        Ok(())
    }
}
