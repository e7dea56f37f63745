use anyhow::{bail, Context};
use std::str::FromStr;
use std::time::Duration;

use crate::domain::page::{CLEANUP_EVERY, PAGE_TTL_SECS};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Host (and optional port) placed in shared links.
    pub public_hostname: String,
    pub page_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}
fn default_port() -> u16 { 8080 }
fn default_hostname() -> String { "localhost:8080".into() }
fn default_ttl() -> u64 { PAGE_TTL_SECS }
fn default_sweep() -> u64 { CLEANUP_EVERY.as_secs() }

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_hostname: default_hostname(),
            page_ttl_secs: default_ttl(),
            sweep_interval_secs: default_sweep(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let cfg = Self {
            port: parse_or(&lookup, "PORT", default_port())?,
            public_hostname: lookup("PUBLIC_HOSTNAME").unwrap_or_else(default_hostname),
            page_ttl_secs: parse_or(&lookup, "PAGE_TTL_SECS", default_ttl())?,
            sweep_interval_secs: parse_or(&lookup, "SWEEP_INTERVAL_SECS", default_sweep())?,
        };
        if cfg.sweep_interval_secs == 0 {
            bail!("SWEEP_INTERVAL_SECS must be at least 1");
        }
        Ok(cfg)
    }

    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}
