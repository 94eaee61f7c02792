//! Client configuration.

use crate::error::{Result, RpcError};
use std::time::Duration;
use url::Url;

/// Default ledger API endpoint.
pub const DEFAULT_API_URL: &str = "https://testnet.giraffechain.com/api";

/// Default wallet base the transfer link is built on.
pub const DEFAULT_WALLET_URL: &str = "https://testnet.giraffechain.com/#";

/// Configuration for the ledger client and wallet sink.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Ledger API base URL
    pub api_url: Url,

    /// Wallet base URL (may end in a `#` fragment marker)
    pub wallet_url: String,

    /// Whole-request HTTP timeout
    pub http_timeout: Duration,

    /// Per-resolution timeout applied by the reconciler
    pub resolve_timeout: Option<Duration>,
}

impl RpcConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `PLOTGRID_API_URL`
    /// - `PLOTGRID_WALLET_URL`
    /// - `PLOTGRID_HTTP_TIMEOUT_SECS` (default 30)
    /// - `PLOTGRID_RESOLVE_TIMEOUT_MS` (unset means no timeout)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("PLOTGRID_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(api_url.trim())?;
        if api_url.cannot_be_a_base() {
            return Err(RpcError::Config(format!("PLOTGRID_API_URL cannot be a base: {api_url}")));
        }

        let wallet_url = lookup("PLOTGRID_WALLET_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_WALLET_URL.to_string());

        let http_timeout = match lookup("PLOTGRID_HTTP_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(parse_number("PLOTGRID_HTTP_TIMEOUT_SECS", &s)?),
            None => Duration::from_secs(30),
        };

        let resolve_timeout = lookup("PLOTGRID_RESOLVE_TIMEOUT_MS")
            .map(|s| parse_number("PLOTGRID_RESOLVE_TIMEOUT_MS", &s).map(Duration::from_millis))
            .transpose()?;

        Ok(Self {
            api_url,
            wallet_url,
            http_timeout,
            resolve_timeout,
        })
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        RpcError::Config(format!("{key} must be a non-negative integer, got {value:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = RpcConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.wallet_url, DEFAULT_WALLET_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.resolve_timeout, None);
    }

    #[test]
    fn overrides() {
        let config = RpcConfig::from_lookup(lookup(&[
            ("PLOTGRID_API_URL", "http://127.0.0.1:9000/api"),
            ("PLOTGRID_WALLET_URL", "http://wallet.local/#"),
            ("PLOTGRID_HTTP_TIMEOUT_SECS", "5"),
            ("PLOTGRID_RESOLVE_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(config.wallet_url, "http://wallet.local/#");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.resolve_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(matches!(
            RpcConfig::from_lookup(lookup(&[("PLOTGRID_HTTP_TIMEOUT_SECS", "soon")])),
            Err(RpcError::Config(_))
        ));
        assert!(matches!(
            RpcConfig::from_lookup(lookup(&[("PLOTGRID_API_URL", "not a url")])),
            Err(RpcError::Url(_))
        ));
        assert!(matches!(
            RpcConfig::from_lookup(lookup(&[("PLOTGRID_API_URL", "mailto:someone@example.com")])),
            Err(RpcError::Config(_))
        ));
    }
}
