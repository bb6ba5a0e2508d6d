//! Process configuration.
//!
//! All options are read from the environment once at startup. The CIDR
//! limit is handed to the validator as a [`CidrLimit`] handle, which is the
//! only value that may change after startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// Default maximum number of CIDRs in an ACL rule
pub const DEFAULT_MAX_ALLOWED_CIDRS: usize = 50;
/// Default webhook server port
pub const DEFAULT_WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const DEFAULT_HEALTH_PORT: u16 = 8080;
/// Default path to webhook TLS certificate
pub const DEFAULT_WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const DEFAULT_WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";

const ENV_MAX_ALLOWED_CIDRS: &str = "ACL_MAX_ALLOWED_CIDRS";
const ENV_WEBHOOK_PORT: &str = "ACL_WEBHOOK_PORT";
const ENV_HEALTH_PORT: &str = "ACL_HEALTH_PORT";
const ENV_WEBHOOK_CERT_PATH: &str = "ACL_WEBHOOK_CERT_PATH";
const ENV_WEBHOOK_KEY_PATH: &str = "ACL_WEBHOOK_KEY_PATH";

/// Shared, read-mostly maximum CIDR count.
///
/// Clones share the same value. Every validation reads the current value,
/// so [`CidrLimit::set`] takes effect for subsequent requests.
#[derive(Clone, Debug)]
pub struct CidrLimit(Arc<AtomicUsize>);

impl CidrLimit {
    pub fn new(max: usize) -> Self {
        Self(Arc::new(AtomicUsize::new(max)))
    }

    /// Current maximum.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// Replace the maximum for all holders of this handle.
    pub fn set(&self, max: usize) {
        self.0.store(max, Ordering::Relaxed);
    }
}

impl Default for CidrLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ALLOWED_CIDRS)
    }
}

/// Startup options of the webhook process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of CIDRs allowed in the ACL rule of a Shoot
    pub max_allowed_cidrs: usize,
    /// Port of the TLS admission endpoint
    pub webhook_port: u16,
    /// Port of the health and metrics endpoint
    pub health_port: u16,
    /// PEM certificate for the admission endpoint
    pub cert_path: PathBuf,
    /// PEM private key for the admission endpoint
    pub key_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_allowed_cidrs: DEFAULT_MAX_ALLOWED_CIDRS,
            webhook_port: DEFAULT_WEBHOOK_PORT,
            health_port: DEFAULT_HEALTH_PORT,
            cert_path: PathBuf::from(DEFAULT_WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(DEFAULT_WEBHOOK_KEY_PATH),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unset or empty variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            max_allowed_cidrs: parse_var(
                &lookup,
                ENV_MAX_ALLOWED_CIDRS,
                defaults.max_allowed_cidrs,
            )?,
            webhook_port: parse_var(&lookup, ENV_WEBHOOK_PORT, defaults.webhook_port)?,
            health_port: parse_var(&lookup, ENV_HEALTH_PORT, defaults.health_port)?,
            cert_path: non_empty(&lookup, ENV_WEBHOOK_CERT_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: non_empty(&lookup, ENV_WEBHOOK_KEY_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
        })
    }

    /// Limit handle initialised from this configuration.
    pub fn cidr_limit(&self) -> CidrLimit {
        CidrLimit::new(self.max_allowed_cidrs)
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("{}={:?}: {}", name, raw, e))),
        None => Ok(default),
    }
}
