use std::env;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 24;
pub const DEFAULT_MAX_POST_LENGTH: usize = 5000;

#[derive(Clone, Debug)]
pub struct Config {
    pub data_file: PathBuf,
    pub bind_addr: String,
    pub token_expiration_hours: i64,
    pub max_post_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            token_expiration_hours: DEFAULT_TOKEN_EXPIRATION_HOURS,
            max_post_length: DEFAULT_MAX_POST_LENGTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_file: load(&lookup, "PLANK_DATA_FILE", defaults.data_file),
            bind_addr: load(&lookup, "PLANK_BIND_ADDR", defaults.bind_addr),
            token_expiration_hours: load(
                &lookup,
                "PLANK_TOKEN_EXPIRATION_HOURS",
                defaults.token_expiration_hours,
            ),
            max_post_length: load(&lookup, "PLANK_MAX_POST_LENGTH", defaults.max_post_length),
        }
    }
}

fn load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default {default:?}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default:?}");
            default
        }
    }
}
