//! # Error Types — Protocol Error Taxonomy
//!
//! Defines the error types used throughout the vobj stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Decode-side errors are raised at the point of detection and never
//!   caught inside the codec; the caller decides between aborting the
//!   whole decode and isolating a failing record.
//! - Encode-side failures are limited to ill-typed input (non-finite
//!   floats) and pathological nesting depth.
//! - The normalizer has no error type at all: it never fails for
//!   well-typed input.

use thiserror::Error;

/// Top-level error type for the vobj protocol stack.
#[derive(Error, Debug)]
pub enum VoError {
    /// A wire key starting with the tagged-object prefix did not have the
    /// expected `$vo:<version>:<module>:<name>` segment structure.
    #[error("malformed tag: {0}")]
    MalformedTag(String),

    /// A well-formed tag named a module/type pair that was never registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A reserved scalar wrapper (`$date`, `$oid`) carried a payload of the
    /// wrong JSON shape.
    #[error("invalid scalar payload: {0}")]
    InvalidScalar(String),

    /// An opaque identifier string violated the 24-hex-character format.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Input nesting exceeded the recursion bound.
    #[error("nesting depth exceeded {0} levels")]
    DepthExceeded(usize),

    /// Input text was not parseable JSON, or an encoded tree could not be
    /// serialized to text.
    #[error("invalid json: {0}")]
    InvalidJson(String),
}
