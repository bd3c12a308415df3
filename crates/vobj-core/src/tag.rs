//! # Type Tags — Stable Wire Identity for Domain Types
//!
//! A `TypeTag` names a domain-object type on the wire, independent of any
//! in-memory type name. Tagged objects travel as single-key JSON objects
//! whose sole key is the tag's wire form:
//!
//! ```text
//! $vo:v1:<module>:<name>
//! ```
//!
//! `module` is a stable logical path to the type's defining unit, never a
//! file path. The `$date` and `$oid` keys are reserved alongside the `$vo:`
//! prefix; a legitimate single-key mapping using any of these shapes will be
//! misread as a special form. This collision hazard is part of the protocol
//! contract — callers must not produce such keys as ordinary data.

use serde::{Deserialize, Serialize};

use crate::error::VoError;

/// Protocol version segment emitted in wire keys.
pub const PROTOCOL_VERSION: &str = "v1";

/// Prefix that marks a single-key mapping as a tagged object.
pub const VO_KEY_PREFIX: &str = "$vo:";

/// Reserved key for the timestamp wire form.
pub const DATE_KEY: &str = "$date";

/// Reserved key for the opaque-identifier wire form.
pub const OID_KEY: &str = "$oid";

/// Legacy type-name suffix superseded by the current convention.
const LEGACY_SUFFIX: &str = "VOV2";

/// Replacement for the legacy suffix.
const CURRENT_SUFFIX: &str = "VO";

/// A domain type's wire identity: logical module path plus declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    module: String,
    name: String,
}

impl TypeTag {
    /// Construct a tag from a logical module path and a type name.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTag` if either segment is empty or contains the
    /// `:` separator.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Result<Self, VoError> {
        let module = module.into();
        let name = name.into();
        for segment in [&module, &name] {
            if segment.is_empty() || segment.contains(':') {
                return Err(VoError::MalformedTag(format!(
                    "tag segment must be non-empty and colon-free: {segment:?}"
                )));
            }
        }
        Ok(Self { module, name })
    }

    /// Parse a wire key of the form `$vo:<version>:<module>:<name>`.
    ///
    /// The version segment is accepted as-is; segment count is the only
    /// structural requirement. A name ending in the legacy `VOV2` suffix is
    /// rewritten to end in `VO` before any registry lookup.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTag` for a wrong segment count or empty segments.
    pub fn parse_wire_key(key: &str) -> Result<Self, VoError> {
        let segments: Vec<&str> = key.split(':').collect();
        let &[marker, _version, module, name] = segments.as_slice() else {
            return Err(VoError::MalformedTag(format!(
                "expected 4 colon-separated segments, got {}: {key:?}",
                segments.len()
            )));
        };
        if marker != "$vo" {
            return Err(VoError::MalformedTag(format!(
                "wire key does not start with $vo: {key:?}"
            )));
        }
        let name = match name.strip_suffix(LEGACY_SUFFIX) {
            Some(stem) => format!("{stem}{CURRENT_SUFFIX}"),
            None => name.to_owned(),
        };
        Self::new(module, name)
    }

    /// The logical module path.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The declared type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single-key wire form: `$vo:v1:<module>:<name>`.
    pub fn wire_key(&self) -> String {
        format!("{VO_KEY_PREFIX}{PROTOCOL_VERSION}:{}:{}", self.module, self.name)
    }

    /// The registry lookup key: `<module>:<name>` (version-independent).
    pub fn registry_key(&self) -> String {
        format!("{}:{}", self.module, self.name)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wire_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_key_format() {
        let tag = TypeTag::new("acme.orders", "OrderVO").unwrap();
        assert_eq!(tag.wire_key(), "$vo:v1:acme.orders:OrderVO");
    }

    #[test]
    fn test_parse_roundtrip() {
        let tag = TypeTag::new("acme.orders", "OrderVO").unwrap();
        let parsed = TypeTag::parse_wire_key(&tag.wire_key()).unwrap();
        assert_eq!(parsed, tag);
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        assert!(matches!(
            TypeTag::parse_wire_key("$vo:v1:acme.orders"),
            Err(VoError::MalformedTag(_))
        ));
        assert!(matches!(
            TypeTag::parse_wire_key("$vo:v1:acme.orders:OrderVO:extra"),
            Err(VoError::MalformedTag(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_marker() {
        assert!(TypeTag::parse_wire_key("$xx:v1:acme.orders:OrderVO").is_err());
    }

    #[test]
    fn test_legacy_suffix_rewritten() {
        let parsed = TypeTag::parse_wire_key("$vo:v1:acme.orders:OrderVOV2").unwrap();
        assert_eq!(parsed.name(), "OrderVO");
    }

    #[test]
    fn test_legacy_suffix_only_at_end() {
        let parsed = TypeTag::parse_wire_key("$vo:v1:acme.orders:VOV2Order").unwrap();
        assert_eq!(parsed.name(), "VOV2Order");
    }

    #[test]
    fn test_new_rejects_colon_in_segment() {
        assert!(TypeTag::new("acme:orders", "OrderVO").is_err());
        assert!(TypeTag::new("acme.orders", "Order:VO").is_err());
    }

    #[test]
    fn test_new_rejects_empty_segment() {
        assert!(TypeTag::new("", "OrderVO").is_err());
        assert!(TypeTag::new("acme.orders", "").is_err());
    }

    #[test]
    fn test_registry_key_drops_version() {
        let tag = TypeTag::new("acme.orders", "OrderVO").unwrap();
        assert_eq!(tag.registry_key(), "acme.orders:OrderVO");
    }
}
