use std::time::Duration;

use clap::Parser;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("directory-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Parser)]
#[command(name = "directory-api", version, about = "Read-only views over the collector directory")]
pub struct Config {
    /// Collector endpoint serving the raw directory document.
    #[arg(
        long,
        alias = "collectorUrl",
        env = "COLLECTOR_URL",
        default_value = "http://collector:8080"
    )]
    pub collector_url: Url,

    #[arg(long, env = "API_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Worker count; actix picks one per core when unset.
    #[arg(long, env = "API_WORKERS")]
    pub workers: Option<usize>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 20)]
    pub upstream_timeout_secs: u64,

    #[arg(long, env = "API_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Config {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
