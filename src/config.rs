use std::{env, net::SocketAddr, path::PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/orders.json";
pub const DEFAULT_PERIOD_DAYS: u32 = 30;
/// Longest window a request may ask for, about ten years of days.
pub const MAX_PERIOD_DAYS: u32 = 3660;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub period_in_days: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let period_in_days = match lookup("REVENUE_PERIOD_DAYS") {
            Some(value) => match value.parse::<u32>() {
                Ok(days) if days > 0 && days <= MAX_PERIOD_DAYS => days,
                _ => {
                    warn!("ignoring invalid REVENUE_PERIOD_DAYS={value:?}");
                    DEFAULT_PERIOD_DAYS
                }
            },
            None => DEFAULT_PERIOD_DAYS,
        };

        Self {
            port,
            data_path,
            period_in_days,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
