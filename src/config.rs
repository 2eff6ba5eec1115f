//! Env-driven configuration for the proxy server.
//!
//! `.env` is loaded on demand by the binary; every value has a development default.
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::PollSettings;
use crate::error::{FashError, Result};
use crate::session::TokenPolicy;

pub const DEFAULT_API_URL: &str = "https://api.headshotmaster.io/hsmaster/api/";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Frontend assets served as the fallback route, when the directory exists.
    pub static_dir: PathBuf,
    pub poll: PollSettings,
    pub token_policy: TokenPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            static_dir: PathBuf::from("frontend"),
            poll: PollSettings::default(),
            token_policy: TokenPolicy::default(),
        }
    }
}

impl Config {
    pub fn dotenv_load() {
        dotenvy::dotenv().ok();
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("FASH_AI_API_URL") {
            config.api_url = url;
        }
        if let Some(host) = lookup("FASH_AI_HOST") {
            config.host = parse("FASH_AI_HOST", &host)?;
        }
        if let Some(port) = lookup("FASH_AI_PORT") {
            config.port = parse("FASH_AI_PORT", &port)?;
        }
        if let Some(dir) = lookup("FASH_AI_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("FASH_AI_POLL_TIMEOUT_SECS") {
            config.poll.timeout = Duration::from_secs(parse("FASH_AI_POLL_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("FASH_AI_POLL_INTERVAL_SECS") {
            let secs: u64 = parse("FASH_AI_POLL_INTERVAL_SECS", &secs)?;
            if secs == 0 {
                return Err(FashError::Config(
                    "FASH_AI_POLL_INTERVAL_SECS must be at least 1".to_string(),
                ));
            }
            config.poll.interval = Duration::from_secs(secs);
        }
        if let Some(policy) = lookup("FASH_AI_TOKEN_POLICY") {
            config.token_policy = policy.parse()?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FashError::Config(format!("invalid value '{}' for {}", value, key)))
}
