use std::path::Path;

use blogd::Result;

use super::{open_db, print_json};

pub fn run(db_path: &Path, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let posts = db.count_posts()?;
    let reasons = db.count_reasons()?;
    let schema_version = db.get_config("schema_version")?.unwrap_or_default();

    if json {
        return print_json(&serde_json::json!({
            "posts": posts,
            "reasons": reasons,
            "schema_version": schema_version,
        }));
    }

    println!("  {:<14} {}", "posts", posts);
    println!("  {:<14} {}", "reasons", reasons);
    println!("  {:<14} {}", "schema", schema_version);
    Ok(())
}
