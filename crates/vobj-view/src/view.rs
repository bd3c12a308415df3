//! # Views — Field-Filtered Projection and Rendering
//!
//! A [`View`] is an ephemeral projection over a tagged domain object:
//! constructed per request, rendered at most once per emission, discarded
//! afterwards. It selects a field subset of the wrapped mapping and renders
//! it through one of two pipelines:
//!
//! - **Full mode** (default): nested domain objects are materialized
//!   recursively, then the normalizer collapses the tree to final client
//!   JSON with the configured display zone.
//! - **Inner mode**: the materialized tree is tag-encoded instead, keeping
//!   `$date` / `$oid` markers so the result can be embedded inside a
//!   still-larger tagged payload and processed further downstream.
//!
//! Nested domain objects encountered during materialization render with
//! the same context and no field filter — projection applies only to the
//! view's own mapping.

use std::collections::BTreeSet;

use vobj_core::{Value, VoError, VoObject};
use vobj_wire::codec::MAX_DEPTH;
use vobj_wire::{encode, normalize, NormalizeOptions};

use crate::context::RenderContext;

/// The result of rendering a view.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// Fully-normalized client JSON (full mode). No wire markers.
    Json(serde_json::Value),
    /// Tag-preserving wire form (inner mode), ready for structural
    /// embedding in a larger payload.
    Tagged(serde_json::Value),
}

impl RenderOutput {
    /// Unwrap to the underlying JSON value, discarding the pipeline marker.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            RenderOutput::Json(v) | RenderOutput::Tagged(v) => v,
        }
    }
}

/// An ephemeral, field-filtered projection of a domain object.
#[derive(Debug, Clone)]
pub struct View<'a> {
    vo: &'a VoObject,
    include: Option<BTreeSet<String>>,
    exclude: BTreeSet<String>,
}

impl<'a> View<'a> {
    /// Project all fields of the given object.
    pub fn new(vo: &'a VoObject) -> Self {
        Self {
            vo,
            include: None,
            exclude: BTreeSet::new(),
        }
    }

    /// Restrict the projection to the given fields.
    pub fn include_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Remove the given fields from the projection.
    pub fn exclude_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Render the projection.
    ///
    /// An absent document renders as null rather than failing. In full
    /// mode the result is normalized client JSON; in inner mode it is the
    /// tag-preserving wire form of the materialized tree.
    ///
    /// # Errors
    ///
    /// Returns `DepthExceeded` for pathologically nested documents, and
    /// inner mode surfaces codec errors (non-finite floats).
    pub fn render(&self, ctx: &RenderContext) -> Result<RenderOutput, VoError> {
        let tree = self.materialized(ctx, 0)?;
        if ctx.inner_mode.is_inner() {
            Ok(RenderOutput::Tagged(encode(&tree)?))
        } else {
            let options = NormalizeOptions::new().with_display_zone(ctx.display_zone);
            Ok(RenderOutput::Json(normalize(&tree, &options)))
        }
    }

    /// The projected, recursively materialized value tree: the view's own
    /// mapping filtered to the field set, with nested domain objects
    /// replaced by their materialized trees (same context, all fields).
    fn materialized(&self, ctx: &RenderContext, depth: usize) -> Result<Value, VoError> {
        if depth > MAX_DEPTH {
            return Err(VoError::DepthExceeded(MAX_DEPTH));
        }
        let Some(inner) = self.vo.inner() else {
            return Ok(Value::Null);
        };
        match inner {
            Value::Mapping(map) => {
                let mut out = std::collections::BTreeMap::new();
                for (key, value) in map {
                    if !self.selects(key) {
                        continue;
                    }
                    out.insert(key.clone(), materialize(value, ctx, depth + 1)?);
                }
                Ok(Value::Mapping(out))
            }
            // A non-mapping document has no fields to filter.
            other => materialize(other, ctx, depth + 1),
        }
    }

    /// Field set membership: (include or all keys) minus exclude.
    fn selects(&self, key: &str) -> bool {
        let included = self.include.as_ref().map_or(true, |set| set.contains(key));
        included && !self.exclude.contains(key)
    }
}

/// Recursively resolve nested domain objects inside a projected tree.
/// Containers recurse; a nested object renders through its own all-fields
/// view with the same context; everything else passes through.
fn materialize(value: &Value, ctx: &RenderContext, depth: usize) -> Result<Value, VoError> {
    if depth > MAX_DEPTH {
        return Err(VoError::DepthExceeded(MAX_DEPTH));
    }
    match value {
        Value::Vo(vo) => View::new(vo).materialized(ctx, depth + 1),
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(materialize(item, ctx, depth + 1)?);
            }
            Ok(Value::Sequence(out))
        }
        Value::Mapping(map) => {
            let mut out = std::collections::BTreeMap::new();
            for (key, v) in map {
                out.insert(key.clone(), materialize(v, ctx, depth + 1)?);
            }
            Ok(Value::Mapping(out))
        }
        Value::Ordered(pairs) => {
            let mut out = Vec::with_capacity(pairs.len());
            for (key, v) in pairs {
                out.push((key.clone(), materialize(v, ctx, depth + 1)?));
            }
            Ok(Value::Ordered(out))
        }
        other => Ok(other.clone()),
    }
}

/// Ergonomic view construction directly on domain objects.
pub trait Viewable {
    /// Start an all-fields view of this object.
    fn view(&self) -> View<'_>;
}

impl Viewable for VoObject {
    fn view(&self) -> View<'_> {
        View::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InnerMode;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::BTreeMap;
    use vobj_core::{OpaqueId, Timestamp, TypeTag, ViewConfig};

    fn order_tag() -> TypeTag {
        TypeTag::new("acme.orders", "OrderVO").unwrap()
    }

    fn line_tag() -> TypeTag {
        TypeTag::new("acme.orders", "LineVO").unwrap()
    }

    fn mapping(entries: Vec<(&str, Value)>) -> Value {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn ctx() -> RenderContext {
        RenderContext::new(&ViewConfig::default())
    }

    fn sample_vo() -> VoObject {
        VoObject::from_inner(
            order_tag(),
            mapping(vec![
                ("a", Value::from(1)),
                ("b", Value::from(2)),
                ("c", Value::from(3)),
            ]),
        )
    }

    // ---- projection ----

    #[test]
    fn test_include_projection() {
        let vo = sample_vo();
        let out = vo
            .view()
            .include_fields(["a", "c"])
            .render(&ctx())
            .unwrap();
        assert_eq!(out, RenderOutput::Json(json!({"a": 1, "c": 3})));
    }

    #[test]
    fn test_include_then_exclude() {
        let vo = sample_vo();
        let out = vo
            .view()
            .include_fields(["a", "c"])
            .exclude_fields(["c"])
            .render(&ctx())
            .unwrap();
        assert_eq!(out, RenderOutput::Json(json!({"a": 1})));
    }

    #[test]
    fn test_default_projects_all_fields() {
        let vo = sample_vo();
        let out = vo.view().render(&ctx()).unwrap();
        assert_eq!(out, RenderOutput::Json(json!({"a": 1, "b": 2, "c": 3})));
    }

    #[test]
    fn test_absent_document_renders_null() {
        let vo = VoObject::new(order_tag(), None);
        let out = vo.view().render(&ctx()).unwrap();
        assert_eq!(out, RenderOutput::Json(serde_json::Value::Null));
    }

    // ---- full mode ----

    #[test]
    fn test_full_mode_applies_display_zone() {
        let dt = Utc
            .with_ymd_and_hms(2023, 6, 15, 10, 30, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        let vo = VoObject::from_inner(
            order_tag(),
            mapping(vec![("created", Value::Timestamp(Timestamp::from_utc(dt)))]),
        );
        let out = vo.view().render(&ctx()).unwrap();
        assert_eq!(
            out,
            RenderOutput::Json(json!({"created": "2023-06-15 18:30:00.123456"}))
        );
    }

    #[test]
    fn test_full_mode_resolves_nested_vo() {
        let line = VoObject::from_inner(line_tag(), mapping(vec![("sku", Value::from("x1"))]));
        let vo = VoObject::from_inner(
            order_tag(),
            mapping(vec![("line", Value::Vo(line)), ("qty", Value::from(2))]),
        );
        let out = vo.view().render(&ctx()).unwrap();
        assert_eq!(
            out,
            RenderOutput::Json(json!({"line": {"sku": "x1"}, "qty": 2}))
        );
    }

    #[test]
    fn test_nested_vo_without_document_dropped_by_normalizer() {
        let line = VoObject::new(line_tag(), None);
        let vo = VoObject::from_inner(
            order_tag(),
            mapping(vec![("line", Value::Vo(line)), ("qty", Value::from(2))]),
        );
        let out = vo.view().render(&ctx()).unwrap();
        assert_eq!(out, RenderOutput::Json(json!({"qty": 2})));
    }

    // ---- inner mode ----

    #[test]
    fn test_inner_mode_preserves_scalar_markers() {
        let id = OpaqueId::new("507f1f77bcf86cd799439011").unwrap();
        let vo = VoObject::from_inner(order_tag(), mapping(vec![("ref", Value::Id(id))]));
        let out = vo
            .view()
            .render(&ctx().with_inner_mode(InnerMode::Inner))
            .unwrap();
        assert_eq!(
            out,
            RenderOutput::Tagged(json!({"ref": {"$oid": "507f1f77bcf86cd799439011"}}))
        );
    }

    #[test]
    fn test_inner_mode_materializes_nested_vo_before_encoding() {
        // The nested object is rendered (all fields) with the same
        // context, so no $vo: wrapper survives, only scalar markers.
        let dt = Utc.with_ymd_and_hms(2023, 6, 15, 10, 30, 0).unwrap();
        let line = VoObject::from_inner(
            line_tag(),
            mapping(vec![("at", Value::Timestamp(Timestamp::from_utc(dt)))]),
        );
        let vo = VoObject::from_inner(order_tag(), mapping(vec![("line", Value::Vo(line))]));
        let out = vo
            .view()
            .render(&ctx().with_inner_mode(InnerMode::Inner))
            .unwrap();
        assert_eq!(
            out,
            RenderOutput::Tagged(json!({"line": {"at": {"$date": 1_686_825_000.0}}}))
        );
    }

    #[test]
    fn test_inner_mode_keeps_nulls() {
        // Inner mode bypasses the normalizer, so null fields survive for
        // the downstream tag-aware processor to decide about.
        let vo = VoObject::from_inner(
            order_tag(),
            mapping(vec![("gone", Value::Null), ("qty", Value::from(2))]),
        );
        let out = vo
            .view()
            .render(&ctx().with_inner_mode(InnerMode::Inner))
            .unwrap();
        assert_eq!(out, RenderOutput::Tagged(json!({"gone": null, "qty": 2})));
    }

    // ---- depth guard ----

    #[test]
    fn test_render_depth_guard() {
        let mut inner = mapping(vec![("leaf", Value::from(0))]);
        for _ in 0..(MAX_DEPTH + 2) {
            inner = mapping(vec![("next", inner)]);
        }
        let vo = VoObject::from_inner(order_tag(), inner);
        assert!(matches!(
            vo.view().render(&ctx()),
            Err(VoError::DepthExceeded(_))
        ));
    }
}
