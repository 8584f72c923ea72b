use std::path::Path;

use blogd::Result;
use blogd::models::{REASON, parse_id};
use colored::Colorize;

use super::{open_db, print_json, print_reasons};

pub fn list(db_path: &Path, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    print_reasons(&db.list_reasons()?, json)
}

pub fn delete(db_path: &Path, raw_id: &str, json: bool) -> Result<()> {
    let id = parse_id(REASON, raw_id)?;
    let db = open_db(db_path)?;
    if !db.delete_reason(&id)? {
        return Err(blogd::Error::NotFound {
            kind: REASON,
            id: id.to_string(),
        });
    }

    if json {
        print_json(&serde_json::json!({ "deleted": id }))
    } else {
        println!("{} reason {id}", "Deleted".red());
        Ok(())
    }
}
