mod commands;

use blogd::auth::DEFAULT_TOKEN_TTL_MINUTES;
use blogd::config::Environment;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "blogd",
    version,
    about = "Blog backend: posts, visitor reasons, and token-gated admin edits"
)]
struct Cli {
    /// Path to the database file
    #[arg(long, env = "BLOGD_DB", default_value = "blog.db", global = true)]
    db: PathBuf,

    /// Output as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and schema
    Init,
    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, env = "BLOGD_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,
        /// Admin session lifetime in minutes
        #[arg(long, env = "BLOGD_TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
        token_ttl: i64,
    },
    /// Manage posts
    Post {
        #[command(subcommand)]
        action: PostAction,
    },
    /// Manage visitor reasons
    Reason {
        #[command(subcommand)]
        action: ReasonAction,
    },
    /// Show post and reason counts
    Stats,
}

#[derive(Subcommand)]
enum PostAction {
    /// List posts, newest first
    List,
    /// Show one post in full
    Show {
        /// Post ID
        id: String,
    },
    /// Create a post
    Create {
        /// Post title
        title: String,
        /// Post body
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the post body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Update a post's title and/or body
    Update {
        /// Post ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New body
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the new body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a post
    Delete {
        /// Post ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ReasonAction {
    /// List reasons, newest first
    List,
    /// Delete a reason
    Delete {
        /// Reason ID
        id: String,
    },
}

fn main() {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    let environment = std::env::var("ENV")
        .map(|v| Environment::parse(&v))
        .unwrap_or_default();
    blogd::logging::init_logging(environment);

    let cli = Cli::parse();
    let db_path = cli.db;

    let result = match cli.command {
        Commands::Init => commands::init::run(&db_path),
        Commands::Serve {
            host,
            port,
            token_ttl,
        } => commands::serve::run(db_path, host, port, token_ttl),
        Commands::Post { action } => match action {
            PostAction::List => commands::post::list(&db_path, cli.json),
            PostAction::Show { id } => commands::post::show(&db_path, &id, cli.json),
            PostAction::Create {
                title,
                content,
                file,
            } => commands::post::create(
                &db_path,
                &title,
                content.as_deref(),
                file.as_deref(),
                cli.json,
            ),
            PostAction::Update {
                id,
                title,
                content,
                file,
            } => commands::post::update(
                &db_path,
                &id,
                title.as_deref(),
                content.as_deref(),
                file.as_deref(),
                cli.json,
            ),
            PostAction::Delete { id } => commands::post::delete(&db_path, &id, cli.json),
        },
        Commands::Reason { action } => match action {
            ReasonAction::List => commands::reason::list(&db_path, cli.json),
            ReasonAction::Delete { id } => commands::reason::delete(&db_path, &id, cli.json),
        },
        Commands::Stats => commands::stats::run(&db_path, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
