//! Grid reconciliation.
//!
//! A pass lists every reference under the claim label, resolves them all
//! concurrently behind a single join, validates each record, and then folds
//! the surviving claims into a fresh [`GridSnapshot`] one at a time. The fold
//! runs after the join, so the accumulator is never shared and needs no lock.
//!
//! Within a cell the highest quantity wins. Equal quantities never replace,
//! so a tie goes to whichever reference the source listed first.

use crate::claim::Claim;
use crate::error::{Error, Result};
use crate::record::SkipReason;
use crate::snapshot::GridSnapshot;
use crate::source::DataSource;
use crate::CLAIM_LABEL;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for a [`GridReconciler`].
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Category label references are listed under.
    pub category: String,

    /// Treat a coordinate that parses to 0 as missing.
    ///
    /// On by default: the existing ledger data cannot tell the two apart.
    pub reject_zero_coordinates: bool,

    /// Per-resolution timeout. Requires a Tokio runtime with time enabled.
    pub resolve_timeout: Option<Duration>,

    /// Cap on concurrent resolutions. `None` starts every resolution
    /// before awaiting any.
    pub max_in_flight: Option<usize>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            category: CLAIM_LABEL.to_string(),
            reject_zero_coordinates: true,
            resolve_timeout: None,
            max_in_flight: None,
        }
    }
}

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// References listed by the source.
    pub references: usize,
    /// Claims that were written into a cell.
    pub applied: usize,
    /// Valid claims that lost to the cell's occupant.
    pub superseded: usize,
    /// Skipped records, keyed by [`SkipReason::kind`].
    pub skipped: BTreeMap<&'static str, usize>,
}

impl ReconcileStats {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.kind()).or_default() += 1;
    }
}

/// Result of [`GridReconciler::reconcile_with_report`].
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub snapshot: GridSnapshot,
    pub stats: ReconcileStats,
}

/// Builds grid snapshots from a [`DataSource`].
#[derive(Debug, Clone, Default)]
pub struct GridReconciler {
    config: ReconcileConfig,
}

impl GridReconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run one pass and return the snapshot.
    ///
    /// Fails only if the source cannot list references. Every per-record
    /// problem is logged and skipped.
    pub async fn reconcile<D: DataSource>(&self, source: &D) -> Result<GridSnapshot> {
        Ok(self.reconcile_with_report(source).await?.snapshot)
    }

    /// Run one pass and return the snapshot together with its counters.
    pub async fn reconcile_with_report<D: DataSource>(&self, source: &D) -> Result<Reconciliation> {
        let references = source
            .list_references(&self.config.category)
            .await
            .map_err(|e| Error::Source(e.to_string()))?;

        tracing::debug!(
            "Resolving {} references for {:?}",
            references.len(),
            self.config.category
        );

        let outcomes: Vec<std::result::Result<Claim, SkipReason>> =
            match self.config.max_in_flight {
                None => join_all(references.iter().map(|r| self.resolve_claim(source, r))).await,
                Some(limit) => {
                    stream::iter(references.iter().map(|r| self.resolve_claim(source, r)))
                        .buffered(limit.max(1))
                        .collect()
                        .await
                }
            };

        let mut snapshot = GridSnapshot::empty();
        let mut stats = ReconcileStats {
            references: references.len(),
            ..Default::default()
        };

        for (reference, outcome) in references.iter().zip(outcomes) {
            match outcome {
                Ok(claim) => {
                    let (coordinate, quantity) = (claim.coordinate, claim.quantity);
                    if snapshot.apply(claim) {
                        tracing::debug!(?reference, %coordinate, quantity, "Setting cell");
                        stats.applied += 1;
                    } else {
                        stats.superseded += 1;
                    }
                }
                Err(reason) => {
                    match &reason {
                        SkipReason::ResolveFailed(_) | SkipReason::TimedOut => {
                            tracing::warn!(?reference, %reason, "Skipping record")
                        }
                        _ => tracing::debug!(?reference, %reason, "Skipping record"),
                    }
                    stats.record_skip(&reason);
                }
            }
        }

        tracing::info!(
            references = stats.references,
            applied = stats.applied,
            superseded = stats.superseded,
            skipped = stats.skipped_total(),
            filled = snapshot.filled(),
            "Reconciled grid"
        );

        Ok(Reconciliation { snapshot, stats })
    }

    async fn resolve_claim<D: DataSource>(
        &self,
        source: &D,
        reference: &D::Reference,
    ) -> std::result::Result<Claim, SkipReason> {
        let resolution = source.resolve(reference);
        let resolved = match self.config.resolve_timeout {
            Some(limit) => tokio::time::timeout(limit, resolution)
                .await
                .map_err(|_| SkipReason::TimedOut)?,
            None => resolution.await,
        };

        resolved
            .map_err(|e| SkipReason::ResolveFailed(e.to_string()))?
            .ok_or(SkipReason::Missing)?
            .validate(self.config.reject_zero_coordinates)
    }
}
