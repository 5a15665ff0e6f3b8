use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub struct AppConfig {
    pub store: StoreBackend,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let store = match env::var("STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Postgres,
        };
        let database = match store {
            StoreBackend::Postgres => DatabaseConfig {
                host: env::var("DATABASE_HOST").context("DATABASE_HOST is not set")?,
                port: env::var("DATABASE_PORT")
                    .context("DATABASE_PORT is not set")?
                    .parse()
                    .context("DATABASE_PORT must be a port number")?,
                username: env::var("DATABASE_USERNAME").context("DATABASE_USERNAME is not set")?,
                password: env::var("DATABASE_PASSWORD").context("DATABASE_PASSWORD is not set")?,
                database: env::var("DATABASE_NAME").context("DATABASE_NAME is not set")?,
            },
            StoreBackend::Memory => DatabaseConfig::default(),
        };
        let server = ServerConfig {
            port: match env::var("SERVER_PORT") {
                Ok(v) => v.parse().context("SERVER_PORT must be a port number")?,
                Err(_) => 8080,
            },
        };
        let seed = SeedConfig {
            user_emails: env::var("SEED_USERS")
                .map(|v| parse_seed_users(&v))
                .unwrap_or_default(),
        };
        Ok(Self {
            store,
            database,
            server,
            seed,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND: {other}"),
        }
    }
}

#[derive(Default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct ServerConfig {
    pub port: u16,
}

// インメモリストアで起動するときに事前登録しておくユーザー
#[derive(Default)]
pub struct SeedConfig {
    pub user_emails: Vec<String>,
}

fn parse_seed_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
