use clap::Parser;
use std::time::Duration;
use uuid::Uuid;

/// Node settings. Every flag falls back to an environment variable, which
/// may come from a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "pow_ledger", about = "Minimal proof-of-work ledger node")]
pub struct Config {
    /// Address to bind the HTTP API to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Identifier credited with mining rewards (random when unset).
    #[arg(long, env = "NODE_ID")]
    pub node_id: Option<String>,

    /// Timeout for fetching a peer's chain.
    #[arg(long, env = "PEER_TIMEOUT_SECS", default_value_t = 5)]
    pub peer_timeout_secs: u64,

    /// Give up mining after this many candidate proofs (unbounded when unset).
    #[arg(long, env = "MAX_POW_ATTEMPTS")]
    pub max_pow_attempts: Option<u64>,
}

impl Config {
    pub fn node_id(&self) -> String {
        self.node_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }
}
