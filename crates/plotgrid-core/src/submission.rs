//! Outgoing claims.

use crate::claim::Claim;
use crate::coord::Coordinate;
use crate::record::{GraphEntry, RawRecord, RawValue, Vertex};
use crate::CLAIM_LABEL;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A claim ready to be handed to a [`ClaimSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub coordinate: Coordinate,
    pub color: String,
    pub quantity: u64,
}

/// Build the submission for claiming `coordinate` with `color`.
///
/// Returns `None` for an empty color; the caller must not submit anything.
///
/// The quantity is 1 for an empty cell. Over an existing claim it is the
/// occupant's quantity plus two: one for the next claim and one more added
/// when the output is packaged. Ledger data already written follows this
/// rule, so it is kept as is.
pub fn build_claim_submission(
    coordinate: Coordinate,
    existing: Option<&Claim>,
    color: &str,
) -> Option<ClaimSubmission> {
    if color.is_empty() {
        return None;
    }

    let quantity = match existing {
        Some(claim) => claim.quantity.saturating_add(1).saturating_add(1),
        None => 1,
    };

    Some(ClaimSubmission {
        coordinate,
        color: color.to_string(),
        quantity,
    })
}

/// Outgoing transaction: a list of outputs shaped like ledger records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub outputs: Vec<RawRecord>,
}

impl ClaimSubmission {
    /// The output record this submission writes to the ledger.
    ///
    /// `x` and `y` are encoded as decimal strings.
    pub fn to_record(&self) -> RawRecord {
        RawRecord {
            value: Some(RawValue {
                quantity: Some(self.quantity.into()),
                graph_entry: Some(GraphEntry {
                    vertex: Some(Vertex {
                        label: Some(CLAIM_LABEL.to_string()),
                        data: Some(json!({
                            "x": self.coordinate.col().to_string(),
                            "y": self.coordinate.row().to_string(),
                            "color": self.color,
                        })),
                    }),
                }),
            }),
        }
    }

    /// Wrap the output in a single-output transaction.
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            outputs: vec![self.to_record()],
        }
    }
}

/// Where submissions go.
///
/// A sink only starts the external interaction (a wallet link, say). It
/// never learns whether the ledger accepted the claim.
pub trait ClaimSink {
    /// What the sink hands back, e.g. the link it produced.
    type Receipt;
    type Error;

    fn submit(&self, submission: &ClaimSubmission) -> Result<Self::Receipt, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: usize, y: usize) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    #[test]
    fn first_claim_is_one() {
        let sub = build_claim_submission(coord(4, 9), None, "#112233").unwrap();
        assert_eq!(sub.quantity, 1);
        assert_eq!(sub.color, "#112233");
        assert_eq!(sub.coordinate, coord(4, 9));
    }

    #[test]
    fn existing_claim_adds_two() {
        let existing = Claim::new(coord(4, 9), "#000000", 4);
        let sub = build_claim_submission(coord(4, 9), Some(&existing), "#112233").unwrap();
        assert_eq!(sub.quantity, 6);
    }

    #[test]
    fn empty_color_is_noop() {
        assert!(build_claim_submission(coord(1, 1), None, "").is_none());
    }

    #[test]
    fn whitespace_color_matches_reconciler() {
        let sub = build_claim_submission(coord(1, 1), None, " ").unwrap();
        assert_eq!(sub.to_record().validate(true).unwrap().color, " ");
    }

    #[test]
    fn out_of_grid_submission_rejected() {
        let json = r#"{ "coordinate": { "x": 99, "y": 5 }, "color": "red", "quantity": 1 }"#;
        assert!(serde_json::from_str::<ClaimSubmission>(json).is_err());
    }

    #[test]
    fn transaction_shape() {
        let sub = build_claim_submission(coord(3, 7), None, "red").unwrap();
        let json = serde_json::to_value(sub.to_transaction()).unwrap();
        assert_eq!(
            json,
            json!({
                "outputs": [{
                    "value": {
                        "quantity": 1,
                        "graphEntry": {
                            "vertex": {
                                "label": "a-small-plot-of-land",
                                "data": { "x": "3", "y": "7", "color": "red" }
                            }
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn submitted_record_reads_back_as_claim() {
        let existing = Claim::new(coord(12, 20), "blue", 3);
        let sub = build_claim_submission(coord(12, 20), Some(&existing), "green").unwrap();
        let claim = sub.to_record().validate(true).unwrap();
        assert_eq!(claim.coordinate, sub.coordinate);
        assert_eq!(claim.color, "green");
        assert!(claim.supersedes(&existing));
    }
}
