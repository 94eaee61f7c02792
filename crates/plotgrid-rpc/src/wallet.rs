//! Wallet transfer links.

use crate::error::{Result, RpcError};
use plotgrid_core::{ClaimSink, ClaimSubmission};
use url::form_urlencoded;

/// Turns a submission into a wallet deep link.
///
/// The link is `<wallet base>/transfer?transaction=<percent-encoded JSON>`.
/// Opening it is left to the caller, and nothing here learns whether the
/// wallet ever broadcast the transaction.
#[derive(Debug, Clone)]
pub struct WalletLinkSink {
    base: String,
}

impl WalletLinkSink {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Build the transfer link for `submission`.
    pub fn transfer_url(&self, submission: &ClaimSubmission) -> Result<String> {
        let transaction = serde_json::to_string(&submission.to_transaction())?;
        let encoded: String = form_urlencoded::byte_serialize(transaction.as_bytes()).collect();
        Ok(format!(
            "{}/transfer?transaction={}",
            self.base.trim_end_matches('/'),
            encoded
        ))
    }
}

impl ClaimSink for WalletLinkSink {
    type Receipt = String;
    type Error = RpcError;

    fn submit(&self, submission: &ClaimSubmission) -> Result<String> {
        let link = self.transfer_url(submission)?;
        tracing::info!(
            coordinate = %submission.coordinate,
            quantity = submission.quantity,
            "Built wallet transfer link"
        );
        Ok(link)
    }
}
