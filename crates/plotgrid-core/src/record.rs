//! Raw ledger records and their validation.
//!
//! Records arrive with no enforced schema. Every level of the structure is
//! optional here, and [`RawRecord::validate`] is the single place that turns
//! one into either a [`Claim`] or a [`SkipReason`].

use crate::claim::Claim;
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A transaction output as returned by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
}

/// The value carried by an output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawValue {
    /// Claim counter. Numbers and decimal strings are both accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_entry: Option<GraphEntry>,
}

/// Graph entry embedded in an output value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex: Option<Vertex>,
}

/// A labelled vertex with a free-form data payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Expected to be an object with `x`, `y` and `color`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Why a record did not make it into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The reference resolved to nothing.
    #[error("reference resolved to nothing")]
    Missing,

    /// The data source failed to resolve this one reference.
    #[error("resolution failed: {0}")]
    ResolveFailed(String),

    /// The configured per-resolution timeout elapsed.
    #[error("resolution timed out")]
    TimedOut,

    #[error("record has no graph entry vertex")]
    MissingVertex,

    #[error("vertex has no data payload")]
    MissingData,

    #[error("x is missing or not an integer")]
    MissingX,

    #[error("y is missing or not an integer")]
    MissingY,

    /// Zero is indistinguishable from "missing" on the existing ledger data.
    #[error("{axis} is zero")]
    ZeroCoordinate { axis: char },

    #[error("coordinate ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i64, y: i64 },

    #[error("color is missing or empty")]
    MissingColor,

    #[error("quantity is missing or not a positive integer")]
    MissingQuantity,
}

impl SkipReason {
    /// Stable short name, used as a counter key.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::Missing => "missing",
            SkipReason::ResolveFailed(_) => "resolve_failed",
            SkipReason::TimedOut => "timed_out",
            SkipReason::MissingVertex => "missing_vertex",
            SkipReason::MissingData => "missing_data",
            SkipReason::MissingX => "missing_x",
            SkipReason::MissingY => "missing_y",
            SkipReason::ZeroCoordinate { .. } => "zero_coordinate",
            SkipReason::OutOfBounds { .. } => "out_of_bounds",
            SkipReason::MissingColor => "missing_color",
            SkipReason::MissingQuantity => "missing_quantity",
        }
    }
}

impl RawRecord {
    /// Validate this record into a claim.
    ///
    /// Checks run in a fixed order and the first failure wins: vertex, data,
    /// `x`, `y`, bounds, `color`, quantity. With `reject_zero_coordinates`
    /// set, a coordinate that parses to 0 is treated like a missing one.
    pub fn validate(&self, reject_zero_coordinates: bool) -> Result<Claim, SkipReason> {
        let value = self.value.as_ref();
        let vertex = value
            .and_then(|v| v.graph_entry.as_ref())
            .and_then(|g| g.vertex.as_ref())
            .ok_or(SkipReason::MissingVertex)?;

        let data = vertex
            .data
            .as_ref()
            .and_then(Value::as_object)
            .ok_or(SkipReason::MissingData)?;

        let x = data.get("x").and_then(parse_int).ok_or(SkipReason::MissingX)?;
        if reject_zero_coordinates && x == 0 {
            return Err(SkipReason::ZeroCoordinate { axis: 'x' });
        }

        let y = data.get("y").and_then(parse_int).ok_or(SkipReason::MissingY)?;
        if reject_zero_coordinates && y == 0 {
            return Err(SkipReason::ZeroCoordinate { axis: 'y' });
        }

        let coordinate = Coordinate::from_signed(x, y).ok_or(SkipReason::OutOfBounds { x, y })?;

        let color = data
            .get("color")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .ok_or(SkipReason::MissingColor)?;

        let quantity = value
            .and_then(|v| v.quantity.as_ref())
            .and_then(parse_quantity)
            .ok_or(SkipReason::MissingQuantity)?;

        Ok(Claim::new(coordinate, color, quantity))
    }
}

/// Parse a coordinate field with leading-integer semantics.
///
/// Strings may carry surrounding whitespace and trailing garbage ("12px" is
/// 12). Fractional numbers are truncated toward zero.
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_leading_int(s),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        _ => None,
    }
}

pub(crate) fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    // Overflow saturates; the bounds check rejects it either way.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_quantity(value: &Value) -> Option<u64> {
    let quantity = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (quantity > 0).then_some(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> RawRecord {
        serde_json::from_value(v).unwrap()
    }

    fn plot(x: Value, y: Value, color: Value, quantity: Value) -> RawRecord {
        record(json!({
            "value": {
                "quantity": quantity,
                "graphEntry": {
                    "vertex": {
                        "label": "a-small-plot-of-land",
                        "data": { "x": x, "y": y, "color": color }
                    }
                }
            }
        }))
    }

    #[test]
    fn valid_record() {
        let claim = plot(json!("3"), json!("7"), json!("#112233"), json!(4))
            .validate(true)
            .unwrap();
        assert_eq!(claim.coordinate, Coordinate::new(3, 7).unwrap());
        assert_eq!(claim.coordinate.row(), 7);
        assert_eq!(claim.color, "#112233");
        assert_eq!(claim.quantity, 4);
    }

    #[test]
    fn missing_structure() {
        assert_eq!(RawRecord::default().validate(true), Err(SkipReason::MissingVertex));
        assert_eq!(
            record(json!({ "value": { "quantity": 1, "graphEntry": {} } })).validate(true),
            Err(SkipReason::MissingVertex)
        );
        assert_eq!(
            record(json!({
                "value": { "quantity": 1, "graphEntry": { "vertex": { "label": "x" } } }
            }))
            .validate(true),
            Err(SkipReason::MissingData)
        );
        assert_eq!(
            record(json!({ "value": { "graphEntry": { "vertex": { "data": "not an object" } } } }))
                .validate(true),
            Err(SkipReason::MissingData)
        );
    }

    #[test]
    fn missing_fields_checked_in_order() {
        let data = |data: Value| {
            record(json!({ "value": { "graphEntry": { "vertex": { "data": data } } } }))
        };

        assert_eq!(data(json!({})).validate(true), Err(SkipReason::MissingX));
        assert_eq!(data(json!({ "x": "1" })).validate(true), Err(SkipReason::MissingY));
        assert_eq!(
            data(json!({ "x": "1", "y": "2" })).validate(true),
            Err(SkipReason::MissingColor)
        );
        assert_eq!(
            data(json!({ "x": "1", "y": "2", "color": "red" })).validate(true),
            Err(SkipReason::MissingQuantity)
        );
    }

    #[test]
    fn zero_coordinates_rejected_by_default() {
        let r = plot(json!("0"), json!("4"), json!("red"), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::ZeroCoordinate { axis: 'x' }));
        assert_eq!(r.validate(false).unwrap().coordinate, Coordinate::new(0, 4).unwrap());

        let r = plot(json!("4"), json!(0), json!("red"), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::ZeroCoordinate { axis: 'y' }));
    }

    #[test]
    fn out_of_bounds_skipped() {
        let r = plot(json!("32"), json!("1"), json!("red"), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::OutOfBounds { x: 32, y: 1 }));

        let r = plot(json!("-3"), json!("1"), json!("red"), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::OutOfBounds { x: -3, y: 1 }));

        let r = plot(json!("99999999999999999999999"), json!("1"), json!("red"), json!(1));
        assert!(matches!(r.validate(true), Err(SkipReason::OutOfBounds { .. })));
    }

    #[test]
    fn lenient_integer_parsing() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("  12px"), Some(12));
        assert_eq!(parse_leading_int("+4"), Some(4));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);

        assert_eq!(parse_int(&json!(7.9)), Some(7));
        assert_eq!(parse_int(&json!(true)), None);
        assert_eq!(parse_int(&Value::Null), None);
    }

    #[test]
    fn unparseable_coordinate_is_missing() {
        let r = plot(json!("left"), json!("1"), json!("red"), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::MissingX));
    }

    #[test]
    fn color_must_be_non_empty_string() {
        let r = plot(json!("1"), json!("1"), json!(""), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::MissingColor));

        let r = plot(json!("1"), json!("1"), json!(123), json!(1));
        assert_eq!(r.validate(true), Err(SkipReason::MissingColor));
    }

    #[test]
    fn quantity_forms() {
        let r = plot(json!("1"), json!("1"), json!("red"), json!("12"));
        assert_eq!(r.validate(true).unwrap().quantity, 12);

        let r = plot(json!("1"), json!("1"), json!("red"), json!(0));
        assert_eq!(r.validate(true), Err(SkipReason::MissingQuantity));

        let r = plot(json!("1"), json!("1"), json!("red"), json!(-2));
        assert_eq!(r.validate(true), Err(SkipReason::MissingQuantity));
    }

    #[test]
    fn unknown_fields_ignored() {
        let r = record(json!({
            "extra": true,
            "value": {
                "quantity": 2,
                "lock": { "ed25519": {} },
                "graphEntry": {
                    "vertex": { "data": { "x": "2", "y": "2", "color": "blue", "note": 1 } }
                }
            }
        }));
        assert_eq!(r.validate(true).unwrap().quantity, 2);
    }

    #[test]
    fn skip_kinds_are_stable() {
        assert_eq!(SkipReason::Missing.kind(), "missing");
        assert_eq!(SkipReason::OutOfBounds { x: 1, y: 2 }.kind(), "out_of_bounds");
        assert_eq!(SkipReason::ZeroCoordinate { axis: 'x' }.to_string(), "x is zero");
    }
}
