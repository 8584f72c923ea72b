use std::path::Path;

use blogd::Result;
use blogd::db::{Database, SCHEMA_VERSION};

pub fn run(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::open(db_path)?;
    db.migrate()?;
    db.set_config("version", env!("CARGO_PKG_VERSION"))?;

    println!("Initialized blog database at {}", db_path.display());
    println!("Schema version: {SCHEMA_VERSION}");
    Ok(())
}
