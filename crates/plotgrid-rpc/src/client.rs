//! Ledger HTTP client.
//!
//! Async reqwest client over the ledger's JSON API. Two calls are needed:
//! list the outputs carrying a vertex with a given label, and fetch one
//! output. No retries; the reconciler treats a failed fetch as a skip.

use crate::config::RpcConfig;
use crate::error::{Result, RpcError};
use plotgrid_core::{DataSource, RawRecord};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use url::Url;

/// Points at one transaction output on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputReference {
    pub transaction_id: String,
    pub index: u32,
}

impl fmt::Display for OutputReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.index)
    }
}

/// Ledger API client.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    api_url: Url,
}

impl RpcClient {
    /// Create a client from configuration.
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("plotgrid/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// List outputs whose vertex carries `label`. No further filters.
    pub async fn query_vertices(&self, label: &str) -> Result<Vec<OutputReference>> {
        let url = self.endpoint(&["query-vertices"])?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "label": label, "where": [] }))
            .send()
            .await?;

        let references: Vec<OutputReference> = check(response).await?.json().await?;
        tracing::debug!("Ledger listed {} outputs for {:?}", references.len(), label);
        Ok(references)
    }

    /// Fetch one output. A 404 or a JSON `null` body is a miss.
    pub async fn transaction_output(
        &self,
        reference: &OutputReference,
    ) -> Result<Option<RawRecord>> {
        let index = reference.index.to_string();
        let url = self.endpoint(&["transaction-outputs", &reference.transaction_id, &index])?;
        let response = self.http.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Missing output {}", reference);
            return Ok(None);
        }

        Ok(check(response).await?.json().await?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RpcError::Config(format!("API URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl DataSource for RpcClient {
    type Reference = OutputReference;
    type Error = RpcError;

    async fn list_references(&self, category: &str) -> Result<Vec<OutputReference>> {
        self.query_vertices(category).await
    }

    async fn resolve(&self, reference: &OutputReference) -> Result<Option<RawRecord>> {
        self.transaction_output(reference).await
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RpcError::Http {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(api: &str) -> RpcClient {
        RpcClient::new(&RpcConfig {
            api_url: Url::parse(api).unwrap(),
            wallet_url: String::new(),
            http_timeout: Duration::from_secs(5),
            resolve_timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_segments() {
        let c = client("http://ledger.local/api");
        let url = c.endpoint(&["transaction-outputs", "abc", "0"]).unwrap();
        assert_eq!(url.as_str(), "http://ledger.local/api/transaction-outputs/abc/0");

        let c = client("http://ledger.local/api/");
        let url = c.endpoint(&["query-vertices"]).unwrap();
        assert_eq!(url.as_str(), "http://ledger.local/api/query-vertices");
    }

    #[test]
    fn endpoint_escapes_ids() {
        let c = client("http://ledger.local/api");
        let url = c.endpoint(&["transaction-outputs", "a/b c", "1"]).unwrap();
        assert_eq!(url.as_str(), "http://ledger.local/api/transaction-outputs/a%2Fb%20c/1");
    }

    #[test]
    fn reference_wire_format() {
        let r: OutputReference =
            serde_json::from_str(r#"{ "transactionId": "tx1", "index": 2 }"#).unwrap();
        assert_eq!(r.transaction_id, "tx1");
        assert_eq!(r.index, 2);
        assert_eq!(r.to_string(), "tx1:2");
    }
}
