//! The data source contract and an in-memory implementation.

use crate::error::Result;
use crate::record::RawRecord;
use crate::CLAIM_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::Path;

/// Where reconciliation gets its records from.
///
/// References are opaque to the reconciler; it only lists them and hands
/// them back for resolution. Implementations own any retry or backoff.
pub trait DataSource {
    /// Opaque handle to one remote record.
    type Reference: fmt::Debug + Send + Sync;

    /// Error for a failed call.
    type Error: fmt::Display;

    /// List every reference tagged with `category`.
    fn list_references(
        &self,
        category: &str,
    ) -> impl Future<Output = std::result::Result<Vec<Self::Reference>, Self::Error>> + Send;

    /// Resolve one reference. `Ok(None)` is a miss.
    fn resolve(
        &self,
        reference: &Self::Reference,
    ) -> impl Future<Output = std::result::Result<Option<RawRecord>, Self::Error>> + Send;
}

fn default_label() -> String {
    CLAIM_LABEL.to_string()
}

/// One stored record in a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub reference: String,

    /// Category the reference is listed under.
    #[serde(default = "default_label")]
    pub label: String,

    /// `None` makes the reference resolve to nothing.
    #[serde(default)]
    pub record: Option<RawRecord>,
}

/// A data source held entirely in memory.
///
/// Used for tests and for the offline fixture mode of the CLI.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<MemoryEntry>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under the claim label.
    pub fn insert(&mut self, reference: impl Into<String>, record: Option<RawRecord>) {
        self.entries.push(MemoryEntry {
            reference: reference.into(),
            label: default_label(),
            record,
        });
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, reference: impl Into<String>, record: Option<RawRecord>) -> Self {
        self.insert(reference, record);
        self
    }

    pub fn push(&mut self, entry: MemoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON array of [`MemoryEntry`].
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<MemoryEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Load a fixture file written as a JSON array of [`MemoryEntry`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl DataSource for MemorySource {
    type Reference = String;
    type Error = crate::Error;

    async fn list_references(&self, category: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.label == category)
            .map(|e| e.reference.clone())
            .collect())
    }

    async fn resolve(&self, reference: &String) -> Result<Option<RawRecord>> {
        Ok(self
            .entries
            .iter()
            .find(|e| &e.reference == reference)
            .and_then(|e| e.record.clone()))
    }
}
