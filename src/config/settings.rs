//! Runtime settings read from the environment (a `.env` file is honoured by the server).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_RESOURCE_DIR: &str = "resources";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Which message store backs the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Firestore,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firestore" => Ok(StoreKind::Firestore),
            "memory" => Ok(StoreKind::Memory),
            _ => Err("expected firestore or memory".into()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// `FIREBASE_CREDENTIALS`: explicit service-account key file. Must exist when set.
    pub credentials_path: Option<PathBuf>,
    /// `FIRESTORE_DATABASE_ID`: named database instance instead of the default one.
    pub database_id: Option<String>,
    /// `RESOURCE_DIR`: where the bundled credentials file is looked up.
    pub resource_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub store: StoreKind,
    pub body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            credentials_path: None,
            database_id: None,
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreKind::Firestore,
            body_limit: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        Ok(Settings {
            credentials_path: get("FIREBASE_CREDENTIALS").map(PathBuf::from),
            database_id: get("FIRESTORE_DATABASE_ID"),
            resource_dir: get("RESOURCE_DIR").map(PathBuf::from).unwrap_or(defaults.resource_dir),
            bind_addr: parse(get("BIND_ADDR"), "BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            store: parse(get("MESSAGE_STORE"), "MESSAGE_STORE")?.unwrap_or(defaults.store),
            body_limit: parse(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES")?.unwrap_or(defaults.body_limit),
        })
    }
}

fn parse<T>(value: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse().map_err(|e: T::Err| ConfigError::InvalidSetting {
                key,
                reason: e.to_string(),
                value: v,
            })
        })
        .transpose()
}
