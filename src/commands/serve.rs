use std::path::PathBuf;

use blogd::config::Config;
use blogd::{Error, Result};

pub fn run(db_path: PathBuf, host: String, port: u16, token_ttl_minutes: i64) -> Result<()> {
    let config = Config::resolve(db_path, host, port, token_ttl_minutes, |key| {
        std::env::var(key).ok()
    })?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Config(format!("failed to start async runtime: {e}")))?;
    runtime.block_on(blogd::web::serve(&config))
}
