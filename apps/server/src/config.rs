use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use itinero_core::constants::{
    DEFAULT_FX_BASE_CURRENCY, DEFAULT_POINT_UNIT_PRICE_MAJOR, DEFAULT_QUOTE_TTL_MINUTES,
    DEFAULT_SETTLEMENT_CURRENCY,
};
use itinero_core::fx::{is_valid_currency_code, normalize_currency_code};
use itinero_core::points::PointsConfig;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";
const DEFAULT_DB_PATH: &str = "./db/itinero.db";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_QUOTE_SWEEP_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Base currency used when a request does not name one.
    pub fx_base_currency: String,
    pub points: PointsConfig,
    /// How often pending quotes past their expiry are marked expired.
    pub quote_sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys take
    /// their defaults; set but unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = parse_or(&lookup, "ITINERO_LISTEN_ADDR", || {
            DEFAULT_LISTEN_ADDR.parse().map_err(anyhow::Error::from)
        })?;
        let db_path = lookup("ITINERO_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let cors_allow = lookup("ITINERO_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or(&lookup, "ITINERO_REQUEST_TIMEOUT_MS", || {
            Ok(DEFAULT_REQUEST_TIMEOUT_MS)
        })?;

        let fx_base_currency =
            lookup("ITINERO_FX_BASE").unwrap_or_else(|| DEFAULT_FX_BASE_CURRENCY.into());
        if !is_valid_currency_code(&fx_base_currency) {
            return Err(anyhow!(
                "ITINERO_FX_BASE must be a 3-letter currency code, got '{}'",
                fx_base_currency
            ));
        }

        let unit_price: f64 = parse_or(&lookup, "POINTS_PRICE_GHS", || {
            Ok(DEFAULT_POINT_UNIT_PRICE_MAJOR)
        })?;
        let ttl_minutes: i64 = parse_or(&lookup, "POINTS_QUOTE_TTL_MIN", || {
            Ok(DEFAULT_QUOTE_TTL_MINUTES)
        })?;
        let settlement = lookup("POINTS_SETTLEMENT_CURRENCY")
            .unwrap_or_else(|| DEFAULT_SETTLEMENT_CURRENCY.into());
        let points = PointsConfig::new(unit_price, ttl_minutes, &settlement)
            .context("invalid points configuration")?;

        let sweep_secs: u64 = parse_or(&lookup, "ITINERO_QUOTE_SWEEP_SECS", || {
            Ok(DEFAULT_QUOTE_SWEEP_SECS)
        })?;
        if sweep_secs == 0 {
            return Err(anyhow!("ITINERO_QUOTE_SWEEP_SECS must be greater than zero"));
        }

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            fx_base_currency: normalize_currency_code(&fx_base_currency),
            points,
            quote_sweep_interval: Duration::from_secs(sweep_secs),
        })
    }

    /// Defaults with the database at `db_path`.
    pub fn with_db_path(db_path: impl Into<String>) -> anyhow::Result<Self> {
        let db_path = db_path.into();
        Self::from_lookup(|key| (key == "ITINERO_DB_PATH").then(|| db_path.clone()))
    }
}

fn parse_or<T, F, D>(lookup: &F, key: &str, default: D) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> anyhow::Result<T>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("invalid {} '{}': {}", key, raw, e)),
        None => default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8088".parse().unwrap());
        assert_eq!(config.db_path, "./db/itinero.db");
        assert_eq!(config.fx_base_currency, "USD");
        assert_eq!(config.points, PointsConfig::default());
        assert_eq!(config.quote_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
    }

    #[test]
    fn points_settings_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("POINTS_PRICE_GHS", "0.55"),
            ("POINTS_QUOTE_TTL_MIN", "30"),
            ("POINTS_SETTLEMENT_CURRENCY", "ngn"),
            ("ITINERO_FX_BASE", "eur"),
        ]))
        .unwrap();
        assert_eq!(config.points.unit_price_major, 0.55);
        assert_eq!(config.points.quote_ttl_minutes, 30);
        assert_eq!(config.points.settlement_currency, "NGN");
        assert_eq!(config.fx_base_currency, "EUR");
    }

    #[test]
    fn invalid_values_are_rejected() {
        for pairs in [
            [("POINTS_PRICE_GHS", "cheap")],
            [("POINTS_PRICE_GHS", "-1")],
            [("POINTS_QUOTE_TTL_MIN", "0")],
            [("ITINERO_LISTEN_ADDR", "nowhere")],
            [("ITINERO_FX_BASE", "DOLLAR")],
            [("ITINERO_QUOTE_SWEEP_SECS", "0")],
        ] {
            assert!(
                Config::from_lookup(lookup_from(&pairs)).is_err(),
                "{:?} should be rejected",
                pairs
            );
        }
    }

    #[test]
    fn with_db_path_overrides_only_the_path() {
        let config = Config::with_db_path("/tmp/x.db").unwrap();
        assert_eq!(config.db_path, "/tmp/x.db");
        assert_eq!(config.fx_base_currency, "USD");
    }
}
