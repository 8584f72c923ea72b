#![allow(deprecated)]
use cucumber::given;

use crate::BlogWorld;

/// Run `blogd` with the given args against the world's database.
/// Stores stdout, stderr, and exit code on the world.
pub fn run_blogd(world: &mut BlogWorld, args: &[&str]) {
    let db_path = world
        .db_path
        .as_ref()
        .expect("db_path not set — did you forget 'Given a blog database is initialized'?");

    let output = assert_cmd::Command::cargo_bin("blogd")
        .expect("blogd binary not found")
        .env("BLOGD_DB", db_path)
        .env_remove("ENV")
        .args(args)
        .output()
        .expect("failed to run blogd");

    world.last_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    world.last_stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    world.last_exit_code = output.status.code().unwrap_or(-1);
}

/// Initialize a fresh blog database into the world's temp dir.
#[given("a blog database is initialized")]
async fn a_blog_database_is_initialized(world: &mut BlogWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("blog.db");

    let output = assert_cmd::Command::cargo_bin("blogd")
        .expect("blogd binary not found")
        .env("BLOGD_DB", &db_path)
        .arg("init")
        .output()
        .expect("failed to run blogd init");

    assert!(
        output.status.success(),
        "blogd init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    world.db_path = Some(db_path);
    // Keep the TempDir alive for the lifetime of the scenario.
    world.db_dir = Some(dir);
}

/// Point the world at a database path that was never initialized.
#[given("no blog database exists")]
async fn no_blog_database_exists(world: &mut BlogWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    world.db_path = Some(dir.path().join("missing.db"));
    world.db_dir = Some(dir);
}
