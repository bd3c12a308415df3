//! # Render Context — Per-Request Rendering Signals
//!
//! Carries the two signals the view layer needs from its surroundings: the
//! rendering mode and the display zone. A context is built per request from
//! the deployment [`ViewConfig`] and the request's `inner_vo` parameter.

use chrono::FixedOffset;
use vobj_core::ViewConfig;

/// Rendering mode for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InnerMode {
    /// Collapse to final client JSON via the normalizer.
    #[default]
    Full,
    /// Preserve tagged-object structure for embedding inside a larger
    /// tagged payload.
    Inner,
}

impl InnerMode {
    /// Parse a request parameter.
    ///
    /// Accepts the case-insensitive string `"true"` as inner mode — a
    /// legacy request-parameter compatibility rule. Every other string,
    /// including `"1"` and `"yes"`, is full mode; there is no general
    /// truthiness coercion.
    pub fn from_request_param(param: Option<&str>) -> Self {
        match param {
            Some(s) if s.eq_ignore_ascii_case("true") => Self::Inner,
            _ => Self::Full,
        }
    }

    /// True for inner mode.
    pub fn is_inner(self) -> bool {
        matches!(self, Self::Inner)
    }
}

impl From<bool> for InnerMode {
    fn from(inner: bool) -> Self {
        if inner {
            Self::Inner
        } else {
            Self::Full
        }
    }
}

/// Per-request rendering context.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// The rendering mode.
    pub inner_mode: InnerMode,
    /// Display zone applied to zone-aware timestamps in full mode.
    pub display_zone: FixedOffset,
}

impl RenderContext {
    /// Full-mode context using the configured display zone.
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            inner_mode: InnerMode::Full,
            display_zone: config.display_zone,
        }
    }

    /// Context from the configured display zone and a raw `inner_vo`
    /// request parameter.
    pub fn from_request(config: &ViewConfig, inner_param: Option<&str>) -> Self {
        Self {
            inner_mode: InnerMode::from_request_param(inner_param),
            display_zone: config.display_zone,
        }
    }

    /// Replace the rendering mode.
    pub fn with_inner_mode(mut self, mode: impl Into<InnerMode>) -> Self {
        self.inner_mode = mode.into();
        self
    }
}
