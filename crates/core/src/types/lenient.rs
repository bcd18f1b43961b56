//! Forgiving deserializers for numeric fields the backend is loose about.
//!
//! Ids and counts arrive as JSON numbers most of the time, but some endpoints
//! return them as strings (`"3"`) or floats (`5.0`), and stock can go
//! negative. One odd field must not make a whole collection undecodable.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Deserialize an entity id from an integer or a numeric string.
///
/// Used by the `define_id!` newtypes.
///
/// # Errors
///
/// Fails when the value is neither, or does not fit in `i32`.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| D::Error::custom(format!("invalid id: {value}")))
}

/// Deserialize an optional count such as stock or quantity.
///
/// Accepts integers, floats (truncated) and numeric strings. Negative values
/// read as 0 and values past `u32::MAX` saturate. Anything else, including
/// `null`, reads as `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer does.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => count_from_number(&n),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(clamp_int)
                .or_else(|| s.parse::<f64>().ok().and_then(clamp_float))
        }
        _ => None,
    })
}

fn count_from_number(n: &Number) -> Option<u32> {
    if let Some(i) = n.as_i64() {
        return Some(clamp_int(i));
    }
    if n.is_u64() {
        return Some(u32::MAX);
    }
    n.as_f64().and_then(clamp_float)
}

fn clamp_int(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_float(value: f64) -> Option<u32> {
    value
        .is_finite()
        .then(|| value.trunc().clamp(0.0, f64::from(u32::MAX)) as u32)
}
