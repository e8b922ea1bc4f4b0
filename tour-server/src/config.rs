//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::export::csv::CsvOptions;
use crate::graph::GraphConfig;
use crate::planner::SearchConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default B-tree minimum degree.
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Default delimiter for seed files and CSV downloads.
pub const DEFAULT_CSV_DELIMITER: u8 = b';';

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// Minimum degree of the place index
    pub min_degree: usize,

    /// CSV file loaded at startup
    pub seed_csv: Option<PathBuf>,

    /// Dialect for seed files and downloads
    pub csv: CsvOptions,

    /// Travel speed and cost
    pub graph: GraphConfig,

    /// Route search limits
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            min_degree: DEFAULT_MIN_DEGREE,
            seed_csv: None,
            csv: CsvOptions::new(DEFAULT_CSV_DELIMITER),
            graph: GraphConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(v) = get("TOUR_BIND_ADDR") {
            config.bind_addr = parse("TOUR_BIND_ADDR", &v)?;
        }
        if let Some(v) = get("TOUR_MIN_DEGREE") {
            let t: usize = parse("TOUR_MIN_DEGREE", &v)?;
            if t < 2 {
                return Err(ConfigError::invalid(
                    "TOUR_MIN_DEGREE",
                    &v,
                    "must be at least 2",
                ));
            }
            config.min_degree = t;
        }
        if let Some(v) = get("TOUR_SEED_CSV") {
            config.seed_csv = Some(PathBuf::from(v));
        }
        if let Some(v) = get("TOUR_CSV_DELIMITER") {
            config.csv.delimiter = parse_delimiter(&v)?;
        }
        if let Some(v) = get("TOUR_SPEED_KMH") {
            let speed: f64 = parse("TOUR_SPEED_KMH", &v)?;
            if !speed.is_finite() || speed <= 0.0 {
                return Err(ConfigError::invalid(
                    "TOUR_SPEED_KMH",
                    &v,
                    "must be positive",
                ));
            }
            config.graph.speed_kmh = speed;
        }
        if let Some(v) = get("TOUR_COST_PER_KM") {
            let cost: f64 = parse("TOUR_COST_PER_KM", &v)?;
            if !cost.is_finite() || cost < 0.0 {
                return Err(ConfigError::invalid(
                    "TOUR_COST_PER_KM",
                    &v,
                    "must not be negative",
                ));
            }
            config.graph.cost_per_km = cost;
        }
        if let Some(v) = get("TOUR_MAX_ROUTES") {
            config.search.max_routes = parse("TOUR_MAX_ROUTES", &v)?;
        }

        Ok(config)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(var, value, e))
}

/// Accepts a single ASCII character, or `tab` / `\t` for a tab.
fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    match value {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    match value.trim().as_bytes() {
        [b] if b.is_ascii() && !b.is_ascii_alphanumeric() => Ok(*b),
        _ => Err(ConfigError::invalid(
            "TOUR_CSV_DELIMITER",
            value,
            "expected a single punctuation character or \"tab\"",
        )),
    }
}
