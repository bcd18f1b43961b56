//! Extraction of logical payloads from inconsistently wrapped responses.
//!
//! The backend is not consistent about envelopes: the same kind of endpoint
//! may answer with a bare array, with `{"data": [...]}`, with
//! `{"result": [...]}`, or with the payload under the resource's plural name
//! (`{"productos": [...]}`). Every call site goes through the functions here
//! instead of sniffing shapes on its own.
//!
//! None of these functions fail. A shape that is not recognised degrades to
//! "nothing": an empty list, an empty record, or `None`. Callers must treat
//! that as a valid (if surprising) result, which means a backend error
//! wrapped in an unexpected shape can surface as "no data".

use serde_json::{Map, Value};

/// Envelope keys that may hold the payload, in precedence order.
pub const PAYLOAD_KEYS: [&str; 2] = ["data", "result"];

/// Keys that may carry the id of a freshly created order.
pub const ORDER_ID_KEYS: [&str; 2] = ["id_pedido", "id"];

/// Extract the list payload of a collection response.
///
/// Precedence:
/// 1. a JSON array is returned unchanged;
/// 2. an object whose `data`, `result`, or `collection_key` field holds an
///    array yields that array (first match wins);
/// 3. anything else yields an empty list.
///
/// ```
/// use pizzeria_core::normalize::normalize_list;
/// use serde_json::json;
///
/// assert_eq!(normalize_list(&json!([1, 2]), None), vec![json!(1), json!(2)]);
/// assert_eq!(normalize_list(&json!({"data": [3]}), None), vec![json!(3)]);
/// assert_eq!(normalize_list(&json!({"productos": [4]}), Some("productos")), vec![json!(4)]);
/// assert!(normalize_list(&json!({}), None).is_empty());
/// assert!(normalize_list(&json!(null), None).is_empty());
/// ```
#[must_use]
pub fn normalize_list(value: &Value, collection_key: Option<&str>) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => PAYLOAD_KEYS
            .iter()
            .copied()
            .chain(collection_key)
            .find_map(|key| match map.get(key) {
                Some(Value::Array(items)) => Some(items.clone()),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Extract the single record of an item response.
///
/// An object under `data` or `result` wins; otherwise an object response is
/// taken as the record itself. Non-object responses (including `null` and
/// empty bodies) yield an empty object, so lenient record types decode to
/// their all-absent default.
#[must_use]
pub fn normalize_record(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return Value::Object(Map::new());
    };

    PAYLOAD_KEYS
        .iter()
        .find_map(|key| match map.get(*key) {
            Some(inner @ Value::Object(_)) => Some(inner.clone()),
            _ => None,
        })
        .unwrap_or_else(|| value.clone())
}

/// Find a numeric identifier anywhere the backend tends to put it.
///
/// Looks at `keys` on the top-level object first, then on objects nested
/// under `data` and `result`. Numbers and numeric strings are accepted; zero,
/// negative, and out-of-range values are not identifiers.
#[must_use]
pub fn find_id(value: &Value, keys: &[&str]) -> Option<i32> {
    let Value::Object(map) = value else {
        return None;
    };

    let at_level = |map: &Map<String, Value>| keys.iter().find_map(|key| map.get(*key).and_then(as_id));

    at_level(map).or_else(|| {
        PAYLOAD_KEYS.iter().find_map(|key| match map.get(*key) {
            Some(Value::Object(inner)) => at_level(inner),
            _ => None,
        })
    })
}

fn as_id(value: &Value) -> Option<i32> {
    let raw = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(raw).ok().filter(|id| *id > 0)
}

/// Token and (optional) user record found in a login response.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub token: String,
    pub user: Option<Value>,
}

/// Find the bearer token and user record in a login response.
///
/// The token is looked up at `token`, then `data.token`, then
/// `result.token`. The user is taken from `usuario` or `user` next to the
/// token; a top-level token may also pair with `data.user`. A missing or
/// blank token yields `None`.
#[must_use]
pub fn extract_login(value: &Value) -> Option<LoginPayload> {
    let token_of = |v: &Value| {
        v.get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_owned)
    };
    let user_of = |v: &Value| {
        ["usuario", "user"]
            .iter()
            .find_map(|key| v.get(*key).filter(|u| u.is_object()).cloned())
    };

    if let Some(token) = token_of(value) {
        let user = user_of(value).or_else(|| {
            value
                .get("data")
                .and_then(|d| d.get("user"))
                .filter(|u| u.is_object())
                .cloned()
        });
        return Some(LoginPayload { token, user });
    }

    PAYLOAD_KEYS.iter().find_map(|key| {
        let inner = value.get(*key)?;
        let token = token_of(inner)?;
        Some(LoginPayload {
            token,
            user: user_of(inner),
        })
    })
}
