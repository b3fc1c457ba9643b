use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::{Context, bail};

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Database connection string.
    pub database_url: String,

    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,

    /// Address the HTTP API listens on.
    pub bind: SocketAddr,

    /// Emit JSON logs instead of pretty-printed ones.
    pub json_logs: bool,

    // =========================
    // Booking configuration
    // =========================
    /// How many times a booking is attempted before giving up on conflicts.
    ///
    /// Each attempt reads the available rooms afresh, selects, and tries to
    /// commit. A commit fails when a concurrent booking took one of the chosen
    /// rooms first; the selection is then discarded.
    ///
    /// Must be at least 1.
    pub max_booking_attempts: usize,

    /// Probability that an available room is marked booked by the
    /// random-occupancy action.
    ///
    /// Must be within 0.0..=1.0.
    pub random_occupancy_ratio: f64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Missing keys fall back
    /// to defaults; present but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://hotel_dev.db?mode=rwc".to_string());

        let port: u16 = parse_or(&lookup, "PORT", 5000)?;
        let bind = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);

        let json_logs = lookup("APP_ENV").unwrap_or_default() == "production";

        let cfg = Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 16)?,
            bind,
            json_logs,
            max_booking_attempts: parse_or(&lookup, "MAX_BOOKING_ATTEMPTS", 3)?,
            random_occupancy_ratio: parse_or(&lookup, "RANDOM_OCCUPANCY_RATIO", 0.3)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.db_max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.max_booking_attempts == 0 {
            bail!("MAX_BOOKING_ATTEMPTS must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.random_occupancy_ratio) {
            bail!(
                "RANDOM_OCCUPANCY_RATIO must be within 0.0..=1.0, got {}",
                self.random_occupancy_ratio
            );
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}
