use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

/// Pickup and delivery stops on a map.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Config {
    /// Address the web UI listens on
    #[arg(long, env = "DISPATCH_BIND", default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Base URL of a Nominatim compatible geocoding service
    #[arg(
        long,
        env = "NOMINATIM_URL",
        default_value = "https://nominatim.openstreetmap.org"
    )]
    pub nominatim_url: String,

    /// Nominatim's usage policy requires an identifying User-Agent
    #[arg(long, env = "GEOCODER_USER_AGENT", default_value = "dispatch_app")]
    pub user_agent: String,

    /// Minimum delay between geocoding requests, in milliseconds
    #[arg(
        long,
        env = "GEOCODER_MIN_DELAY_MS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1000..)
    )]
    pub min_delay_ms: u64,

    #[arg(long, env = "GEOCODER_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,

    /// How long a geocoding result stays cached
    #[arg(long, env = "GEOCODER_CACHE_TTL_SECS", default_value_t = 24 * 60 * 60)]
    pub cache_ttl_secs: u64,

    #[arg(
        long,
        env = "GEOCODER_CACHE_CAPACITY",
        default_value_t = 512,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_capacity: u64,

    #[arg(long, env = "DISPATCH_LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Export spans over OTLP/gRPC when set, e.g. http://localhost:4317
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
