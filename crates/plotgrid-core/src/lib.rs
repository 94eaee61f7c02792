//! Plotgrid Core - Grid Reconciliation
//!
//! A fixed 32x32 grid whose cells are claimed by vertex records on a
//! ledger. This crate turns an unordered, possibly duplicated, possibly
//! malformed set of those records into a deterministic grid snapshot, and
//! builds the outgoing record for a new claim.
//!
//! # Architecture
//!
//! - **Record**: the loosely-typed wire record and its validation into a
//!   [`Claim`] or a [`SkipReason`]
//! - **Snapshot**: the [`GridSnapshot`] matrix, highest quantity per cell
//! - **Source**: the [`DataSource`] contract plus an in-memory [`MemorySource`]
//! - **Reconciler**: [`GridReconciler`], fan-out resolution and fold
//! - **Submission**: [`build_claim_submission`] and the [`ClaimSink`] contract
//!
//! Network access and presentation live elsewhere; see `plotgrid-rpc`.
//!
//! # Example
//!
//! ```no_run
//! use plotgrid_core::{reconcile, MemorySource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = MemorySource::load("fixture.json")?;
//!     let grid = reconcile(&source).await?;
//!     println!("{} cells claimed", grid.filled());
//!     Ok(())
//! }
//! ```

mod claim;
mod coord;
pub mod error;
pub mod reconciler;
pub mod record;
mod snapshot;
pub mod source;
pub mod submission;

pub use claim::Claim;
pub use coord::Coordinate;
pub use error::{Error, Result};
pub use reconciler::{GridReconciler, ReconcileConfig, ReconcileStats, Reconciliation};
pub use record::{GraphEntry, RawRecord, RawValue, SkipReason, Vertex};
pub use snapshot::GridSnapshot;
pub use source::{DataSource, MemoryEntry, MemorySource};
pub use submission::{build_claim_submission, ClaimSink, ClaimSubmission, Transaction};

/// Width and height of the grid.
pub const GRID_SIZE: usize = 32;

/// Vertex label identifying claimed-cell records.
pub const CLAIM_LABEL: &str = "a-small-plot-of-land";

/// Reconcile `source` with the default configuration.
pub async fn reconcile<D: DataSource>(source: &D) -> Result<GridSnapshot> {
    GridReconciler::default().reconcile(source).await
}
