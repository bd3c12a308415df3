//! # JSON Normalizer — Final Conversion Before Transport
//!
//! Renders an in-memory [`Value`] tree into plain, client-facing JSON:
//! timestamps become formatted strings, identifiers their hex form, nulls
//! are dropped, ordered mappings are re-expressed as pair sequences. No
//! `$vo:` / `$date` / `$oid` marker ever appears in normalized output —
//! normalization is always the last step before transport.
//!
//! The normalizer never fails. A tagged object reaching this layer is the
//! permissive fallback path (callers are expected to materialize views
//! first); it renders as its inner value and emits a debug event so the
//! path is observable. Unrecognized-shape permissiveness can mask encoding
//! bugs, which is why the diagnostic exists.

use chrono::FixedOffset;
use serde_json::Number;
use vobj_core::Value;

/// Field name rewritten to `id` when renaming is requested.
const ID_FIELD: &str = "_id";

/// Rendering policy for [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Keep null elements and null-valued entries instead of dropping them.
    pub reserve_none: bool,
    /// Zone applied to zone-aware timestamps before formatting. The zone
    /// only selects the wall-clock numbers; it is never serialized.
    pub display_zone: Option<FixedOffset>,
    /// Rewrite mapping keys equal to `_id` to `id`.
    pub rename_id_field: bool,
}

impl NormalizeOptions {
    /// Default policy: drop nulls, no zone shift, no key rename.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep nulls instead of dropping them.
    pub fn with_reserve_none(mut self) -> Self {
        self.reserve_none = true;
        self
    }

    /// Shift zone-aware timestamps to the given zone before formatting.
    pub fn with_display_zone(mut self, zone: FixedOffset) -> Self {
        self.display_zone = Some(zone);
        self
    }

    /// Rewrite `_id` keys to `id`.
    pub fn with_rename_id_field(mut self) -> Self {
        self.rename_id_field = true;
        self
    }
}

/// Convert a value tree to JSON-emittable form. Never fails; scalars of
/// unrecognized shape for this layer pass through permissively.
pub fn normalize(value: &Value, options: &NormalizeOptions) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Timestamp(ts) => {
            serde_json::Value::String(ts.format_display(options.display_zone.as_ref()))
        }
        Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
        Value::Id(id) => serde_json::Value::String(id.as_str().to_owned()),
        // Containers drop entries that normalize to null (absent values,
        // non-finite floats, empty documents) unless retention is
        // requested. This is payload-size policy, checked after the
        // element's own normalization.
        Value::Sequence(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|v| normalize(v, options))
                .filter(|v| options.reserve_none || !v.is_null())
                .collect(),
        ),
        Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (key, v) in map {
                let rendered = normalize(v, options);
                if rendered.is_null() && !options.reserve_none {
                    continue;
                }
                out.insert(normalize_key(key, options), rendered);
            }
            serde_json::Value::Object(out)
        }
        // Ordered mappings are re-expressed as a sequence of [key, value]
        // pairs: plain JSON objects are order-irrelevant in the target
        // representation, but these payloads' order matters. The pairs
        // follow the sequence null-dropping rule, so a null value leaves a
        // one-element pair unless retention is requested.
        Value::Ordered(pairs) => serde_json::Value::Array(
            pairs
                .iter()
                .map(|(key, v)| {
                    let mut pair = vec![serde_json::Value::String(normalize_key(key, options))];
                    let rendered = normalize(v, options);
                    if options.reserve_none || !rendered.is_null() {
                        pair.push(rendered);
                    }
                    serde_json::Value::Array(pair)
                })
                .collect(),
        ),
        Value::Vo(vo) => {
            tracing::debug!(tag = %vo.tag(), "normalizing unmaterialized tagged object");
            match vo.inner() {
                Some(inner) => normalize(inner, options),
                None => serde_json::Value::Null,
            }
        }
    }
}

fn normalize_key(key: &str, options: &NormalizeOptions) -> String {
    if options.rename_id_field && key == ID_FIELD {
        "id".to_owned()
    } else {
        key.to_owned()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use vobj_core::{OpaqueId, Timestamp};

    fn any_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            any::<f64>().prop_map(Value::Float),
            "[a-zA-Z0-9_ ]{0,24}".prop_map(Value::String),
            (0i64..=4_102_444_800_000_000i64).prop_map(|micros| {
                Value::Timestamp(Timestamp::from_epoch_micros(micros).unwrap())
            }),
            "[0-9a-f]{24}".prop_map(|s| Value::Id(OpaqueId::new(s).unwrap())),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Sequence),
                prop::collection::btree_map("[a-z_]{1,8}", inner.clone(), 0..6)
                    .prop_map(|m| Value::Mapping(m.into_iter().collect())),
                prop::collection::vec(("[a-z]{1,8}", inner), 0..6)
                    .prop_map(Value::Ordered),
            ]
        })
    }

    fn contains_reserved_key(value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::Object(map) => map.iter().any(|(k, v)| {
                k.starts_with("$vo:")
                    || k == "$date"
                    || k == "$oid"
                    || contains_reserved_key(v)
            }),
            serde_json::Value::Array(items) => items.iter().any(contains_reserved_key),
            _ => false,
        }
    }

    proptest! {
        /// The normalizer has no failure path.
        #[test]
        fn normalize_never_panics(value in any_value()) {
            let _ = normalize(&value, &NormalizeOptions::new());
            let _ = normalize(&value, &NormalizeOptions::new().with_reserve_none());
        }

        /// Normalized output carries no wire markers.
        #[test]
        fn normalized_output_has_no_reserved_keys(value in any_value()) {
            let out = normalize(&value, &NormalizeOptions::new());
            prop_assert!(!contains_reserved_key(&out));
        }

        /// Normalizing already-normalized content is the identity.
        #[test]
        fn normalize_idempotent(value in any_value()) {
            let first = normalize(&value, &NormalizeOptions::new());
            let second = normalize(&Value::from(first.clone()), &NormalizeOptions::new());
            prop_assert_eq!(second, first);
        }
    }
}
