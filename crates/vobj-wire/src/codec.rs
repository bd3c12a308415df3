//! # Tagged Object Codec — Type-Preserving JSON Transport
//!
//! Depth-first transforms between the in-memory [`Value`] union and a
//! JSON-safe `serde_json::Value` tree. Type identity survives the trip:
//! tagged objects travel as single-key objects under their `$vo:` wire key,
//! timestamps as `{"$date": <float seconds>}`, identifiers as
//! `{"$oid": "<hex24>"}`.
//!
//! ## Reserved-Key Hazard
//!
//! The decoder unconditionally treats any single-entry object whose key
//! starts with `$vo:` (or equals `$date` / `$oid`) as a special form. A
//! legitimate one-entry mapping using such a key is structurally
//! indistinguishable and will be misread. These keys are reserved by the
//! protocol contract.
//!
//! ## Failure Policy
//!
//! Decode errors propagate from the point of detection; the codec never
//! catches its own errors. The caller chooses between failing the whole
//! decode and isolating per-record failures in a batch. Encode fails only
//! for non-finite floats and pathological nesting.

use serde_json::{Map, Number};
use vobj_core::{TypeTag, Value, VoError, DATE_KEY, OID_KEY, VO_KEY_PREFIX};
use vobj_core::{OpaqueId, Timestamp};

use crate::registry::TagRegistry;

/// Maximum nesting depth accepted by encode and decode. Inputs nested
/// deeper fail with `DepthExceeded` instead of exhausting the stack.
pub const MAX_DEPTH: usize = 128;

/// Encode an in-memory value into its JSON-safe wire form.
///
/// # Errors
///
/// Returns `InvalidScalar` for non-finite floats and `DepthExceeded` for
/// nesting beyond [`MAX_DEPTH`]. Well-typed input cannot otherwise fail.
pub fn encode(value: &Value) -> Result<serde_json::Value, VoError> {
    encode_at(value, 0)
}

fn encode_at(value: &Value, depth: usize) -> Result<serde_json::Value, VoError> {
    if depth > MAX_DEPTH {
        return Err(VoError::DepthExceeded(MAX_DEPTH));
    }
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::Number(Number::from(*i))),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| VoError::InvalidScalar(format!("non-finite float: {f}"))),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Timestamp(ts) => {
            let mut out = Map::with_capacity(1);
            out.insert(DATE_KEY.to_owned(), serde_json::Value::from(ts.epoch_secs_f64()));
            Ok(serde_json::Value::Object(out))
        }
        // Dates are not part of the closed wire scalar set; they pass
        // through as their display string.
        Value::Date(d) => Ok(serde_json::Value::String(d.format("%Y-%m-%d").to_string())),
        Value::Id(id) => {
            let mut out = Map::with_capacity(1);
            out.insert(OID_KEY.to_owned(), serde_json::Value::String(id.as_str().to_owned()));
            Ok(serde_json::Value::Object(out))
        }
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(encode_at(item, depth + 1)?);
            }
            Ok(serde_json::Value::Array(out))
        }
        Value::Mapping(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(encode_key(k), encode_at(v, depth + 1)?);
            }
            Ok(serde_json::Value::Object(out))
        }
        Value::Ordered(pairs) => {
            let mut out = Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                out.insert(encode_key(k), encode_at(v, depth + 1)?);
            }
            Ok(serde_json::Value::Object(out))
        }
        Value::Vo(vo) => {
            let inner = match vo.inner() {
                Some(inner) => encode_at(inner, depth + 1)?,
                None => serde_json::Value::Null,
            };
            let mut out = Map::with_capacity(1);
            out.insert(vo.tag().wire_key(), inner);
            Ok(serde_json::Value::Object(out))
        }
    }
}

/// Mapping keys funnel through this single seam. String keys encode to
/// themselves; a future non-string key type plugs in here.
fn encode_key(key: &str) -> String {
    key.to_owned()
}

/// Decode a JSON-safe wire tree back into the in-memory value union,
/// reconstructing domain objects via the registry.
///
/// # Errors
///
/// - `MalformedTag` — a `$vo:`-prefixed key with the wrong segment count.
/// - `UnknownType` — a well-formed tag with no registered factory.
/// - `InvalidScalar` / `InvalidIdentifier` — malformed `$date` / `$oid`
///   payloads.
/// - `DepthExceeded` — nesting beyond [`MAX_DEPTH`].
pub fn decode(registry: &TagRegistry, value: &serde_json::Value) -> Result<Value, VoError> {
    decode_at(registry, value, 0)
}

fn decode_at(
    registry: &TagRegistry,
    value: &serde_json::Value,
    depth: usize,
) -> Result<Value, VoError> {
    if depth > MAX_DEPTH {
        return Err(VoError::DepthExceeded(MAX_DEPTH));
    }
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(decode_at(registry, item, depth + 1)?);
            }
            Ok(Value::Sequence(out))
        }
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, payload)) = map.iter().next() {
                    if key.starts_with(VO_KEY_PREFIX) {
                        return decode_tagged(registry, key, payload, depth);
                    }
                    if key == DATE_KEY {
                        return decode_timestamp(payload);
                    }
                    if key == OID_KEY {
                        return decode_opaque_id(payload);
                    }
                }
            }
            let mut out = std::collections::BTreeMap::new();
            for (k, v) in map {
                out.insert(k.clone(), decode_at(registry, v, depth + 1)?);
            }
            Ok(Value::Mapping(out))
        }
    }
}

fn decode_tagged(
    registry: &TagRegistry,
    key: &str,
    payload: &serde_json::Value,
    depth: usize,
) -> Result<Value, VoError> {
    let tag = TypeTag::parse_wire_key(key)?;
    let factory = registry.resolve(&tag)?;
    let inner = match payload {
        serde_json::Value::Null => None,
        other => Some(decode_at(registry, other, depth + 1)?),
    };
    Ok(Value::Vo(factory(inner)))
}

fn decode_timestamp(payload: &serde_json::Value) -> Result<Value, VoError> {
    let secs = payload.as_f64().ok_or_else(|| {
        VoError::InvalidScalar(format!("$date payload must be a number, got {payload}"))
    })?;
    Ok(Value::Timestamp(Timestamp::from_epoch_secs_f64(secs)?))
}

fn decode_opaque_id(payload: &serde_json::Value) -> Result<Value, VoError> {
    let raw = payload.as_str().ok_or_else(|| {
        VoError::InvalidScalar(format!("$oid payload must be a string, got {payload}"))
    })?;
    Ok(Value::Id(OpaqueId::new(raw)?))
}

/// Encode a value and serialize it to JSON text.
pub fn to_json_text(value: &Value) -> Result<String, VoError> {
    let encoded = encode(value)?;
    serde_json::to_string(&encoded).map_err(|e| VoError::InvalidJson(e.to_string()))
}

/// Parse JSON text and decode it back into the value union.
pub fn from_json_text(registry: &TagRegistry, text: &str) -> Result<Value, VoError> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| VoError::InvalidJson(e.to_string()))?;
    decode(registry, &parsed)
}
