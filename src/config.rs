use chrono::Duration;
use std::path::PathBuf;

use crate::auth::Credentials;
use crate::error::{Error, Result};

pub const PRODUCTION_ORIGINS: &[&str] = &[
    "https://blog.athrv.me",
    "https://react-blog-ivory-seven.vercel.app",
];

pub const DEVELOPMENT_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Anything other than `production` (any case) is development.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }

    pub fn default_origins(&self) -> &'static [&'static str] {
        match self {
            Environment::Production => PRODUCTION_ORIGINS,
            Environment::Development => DEVELOPMENT_ORIGINS,
        }
    }
}

/// Everything the HTTP server needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub credentials: Option<Credentials>,
    pub token_ttl: Duration,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Combine CLI values with environment settings read through `lookup`.
    ///
    /// `lookup` is `std::env::var` in the binary; tests pass a map.
    pub fn resolve<F>(
        db_path: PathBuf,
        host: String,
        port: u16,
        token_ttl_minutes: i64,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if token_ttl_minutes <= 0 {
            return Err(Error::Config(format!(
                "token TTL must be positive, got {token_ttl_minutes} minutes"
            )));
        }
        let token_ttl = Duration::try_minutes(token_ttl_minutes).ok_or_else(|| {
            Error::Config(format!(
                "token TTL out of range, got {token_ttl_minutes} minutes"
            ))
        })?;

        let environment = lookup("ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let cors_origins = match lookup("BLOGD_CORS_ORIGINS") {
            Some(list) => parse_origins(&list)?,
            None => environment
                .default_origins()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(Config {
            db_path,
            host,
            port,
            environment,
            credentials: Credentials::new(lookup("ADMIN"), lookup("KEY")),
            token_ttl,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
///
/// Credentialed CORS cannot use `*`, so a wildcard entry is an error.
fn parse_origins(list: &str) -> Result<Vec<String>> {
    let origins: Vec<String> = list
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    if origins.iter().any(|o| o == "*") {
        return Err(Error::Config(
            "wildcard origin not allowed with credentials".into(),
        ));
    }
    Ok(origins)
}
