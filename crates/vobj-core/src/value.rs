//! # Value Union — The Recursive Tree Every Operation Walks
//!
//! `Value` is the in-memory union the whole stack operates over: scalars,
//! containers, and tagged domain objects. The wire codec converts between
//! `Value` and `serde_json::Value`; the normalizer renders `Value` into
//! client-facing JSON.
//!
//! ## Design
//!
//! `Value` deliberately does **not** derive serde traits. The tagged-object
//! codec is the only serialization path, and a derived representation would
//! be a second, wrong one. The scalar newtypes (`Timestamp`, `OpaqueId`,
//! `TypeTag`) do derive serde for embedding in callers' own types.
//!
//! Plain mappings use `BTreeMap`: key order is semantically irrelevant but
//! iteration stays deterministic. Ordered mappings keep insertion order as
//! a pair list and normalize differently (see the normalizer). Set-like
//! source containers have no variant of their own — callers supply a
//! `Sequence` in whatever deterministic order they choose.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::scalar::{OpaqueId, Timestamp};
use crate::tag::TypeTag;

/// The recursive value union.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value. Dropped by the normalizer unless retention is requested.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Absolute instant, microsecond precision (see [`Timestamp`]).
    Timestamp(Timestamp),
    /// Calendar date without time of day.
    Date(NaiveDate),
    /// Opaque 24-hex document identifier.
    Id(OpaqueId),
    /// Order-preserving sequence.
    Sequence(Vec<Value>),
    /// Plain mapping: key-unique, order-irrelevant.
    Mapping(BTreeMap<String, Value>),
    /// Ordered mapping: key-unique by construction policy, insertion order
    /// significant.
    Ordered(Vec<(String, Value)>),
    /// A tagged domain object.
    Vo(VoObject),
}

impl Value {
    /// True if this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string form, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the sequence elements, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the plain mapping, if this is one.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the tagged object, if this is one.
    pub fn as_vo(&self) -> Option<&VoObject> {
        match self {
            Value::Vo(vo) => Some(vo),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<OpaqueId> for Value {
    fn from(v: OpaqueId) -> Self {
        Value::Id(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Sequence(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Mapping(v)
    }
}

impl From<VoObject> for Value {
    fn from(v: VoObject) -> Self {
        Value::Vo(v)
    }
}

impl From<serde_json::Value> for Value {
    /// Lift plain JSON into the union without any tag interpretation.
    /// Numbers become `Int` when integral in `i64` range, `Float`
    /// otherwise; objects become plain mappings.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

/// A tagged domain object: a type tag plus an optional inner value.
///
/// The inner value is usually a `Mapping` wrapping a raw document; it can
/// be absent, which renders as null rather than failing. Construction is
/// single-phase — tag and inner state arrive together, there is no
/// allocate-then-populate step.
#[derive(Debug, Clone, PartialEq)]
pub struct VoObject {
    tag: TypeTag,
    inner: Option<Box<Value>>,
}

impl VoObject {
    /// Construct from a tag and an optional inner value.
    pub fn new(tag: TypeTag, inner: Option<Value>) -> Self {
        Self {
            tag,
            inner: inner.map(Box::new),
        }
    }

    /// Construct from a tag and a present inner value.
    pub fn from_inner(tag: TypeTag, inner: Value) -> Self {
        Self::new(tag, Some(inner))
    }

    /// The type tag carried by this instance.
    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    /// The wrapped inner value, if present.
    pub fn inner(&self) -> Option<&Value> {
        self.inner.as_deref()
    }

    /// Look up a field of the inner mapping. Absent document or non-mapping
    /// inner value yields `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner()?.as_mapping()?.get(key)
    }

    /// True if the inner mapping has the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a field into the inner mapping. A no-op when the document is
    /// absent or the inner value is not a mapping.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        if let Some(Value::Mapping(map)) = self.inner.as_deref_mut() {
            map.insert(key.into(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_tag() -> TypeTag {
        TypeTag::new("acme.orders", "OrderVO").unwrap()
    }

    #[test]
    fn test_vo_field_access() {
        let mut inner = BTreeMap::new();
        inner.insert("status".to_owned(), Value::from("open"));
        let vo = VoObject::from_inner(order_tag(), Value::Mapping(inner));
        assert_eq!(vo.get("status").and_then(Value::as_str), Some("open"));
        assert!(vo.contains_key("status"));
        assert!(!vo.contains_key("missing"));
    }

    #[test]
    fn test_vo_absent_document() {
        let vo = VoObject::new(order_tag(), None);
        assert!(vo.inner().is_none());
        assert_eq!(vo.get("anything"), None);
    }

    #[test]
    fn test_vo_insert_into_mapping() {
        let mut vo = VoObject::from_inner(order_tag(), Value::Mapping(BTreeMap::new()));
        vo.insert("qty", Value::from(3));
        assert_eq!(vo.get("qty"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_vo_insert_noop_when_absent() {
        let mut vo = VoObject::new(order_tag(), None);
        vo.insert("qty", Value::from(3));
        assert!(vo.inner().is_none());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from("x"), Value::String("x".to_owned()));
        assert!(Value::Null.is_null());
    }
}
