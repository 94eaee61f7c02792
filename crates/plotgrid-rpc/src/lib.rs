//! Plotgrid RPC - Ledger Client and Wallet Links
//!
//! Network-facing collaborators for `plotgrid-core`:
//!
//! - [`RpcClient`] implements [`plotgrid_core::DataSource`] over the ledger's
//!   HTTP API
//! - [`WalletLinkSink`] implements [`plotgrid_core::ClaimSink`] by building a
//!   wallet transfer link
//! - [`RpcConfig`] reads endpoints and timeouts from the environment
//!
//! # Example
//!
//! ```no_run
//! use plotgrid_core::GridReconciler;
//! use plotgrid_rpc::{RpcClient, RpcConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RpcConfig::from_env()?;
//!     let client = RpcClient::new(&config)?;
//!     let grid = GridReconciler::default().reconcile(&client).await?;
//!     println!("{} cells claimed", grid.filled());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod wallet;

pub use client::{OutputReference, RpcClient};
pub use config::{RpcConfig, DEFAULT_API_URL, DEFAULT_WALLET_URL};
pub use error::{Result, RpcError};
pub use wallet::WalletLinkSink;
