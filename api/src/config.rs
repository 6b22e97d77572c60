use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_max_lifetime: Duration,
    /// Deadline applied to every HTTP request
    pub request_timeout: Duration,
    /// Apply `migrations/0001_init.sql` at startup
    pub run_migrations: bool,
    /// Seed for reproducible reviewer selection; OS-seeded when unset
    pub random_seed: Option<u64>,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = first_var(&["DATABASE_URL", "APP_DB_DSN"])
            .ok_or_else(|| anyhow!("DATABASE_URL (or APP_DB_DSN) must be set"))?;

        Ok(Self {
            database_url,
            port: parse_or(&["PORT", "APP_HTTP_PORT"], 8080)?,
            db_max_connections: parse_or(&["DB_MAX_CONNECTIONS"], 10)?,
            db_min_connections: parse_or(&["DB_MIN_CONNECTIONS"], 5)?,
            db_max_lifetime: Duration::from_secs(parse_or(&["DB_MAX_LIFETIME_SECS"], 3600)?),
            request_timeout: Duration::from_secs(parse_or(&["REQUEST_TIMEOUT_SECS"], 30)?),
            run_migrations: parse_or(&["RUN_MIGRATIONS"], true)?,
            random_seed: parse_opt(&["RANDOM_SEED"])?,
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|v| !v.is_empty()))
}

fn parse_opt<T>(names: &[&str]) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match first_var(names) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value {:?} for {}", raw, names[0])),
        None => Ok(None),
    }
}

fn parse_or<T>(names: &[&str], default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(names)?.unwrap_or(default))
}
