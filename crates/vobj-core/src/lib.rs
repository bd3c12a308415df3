//! # vobj-core — Foundational Types for the vobj Stack
//!
//! This crate is the leaf of the workspace DAG. It defines the recursive
//! value union, the two non-primitive wire scalars, type tags, the protocol
//! error taxonomy, and render configuration. Every other crate in the
//! workspace depends on `vobj-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for wire scalars.** `Timestamp` stores epoch
//!    microseconds so float-seconds wire round-trips keep six fractional
//!    digits; `OpaqueId` validates its 24-hex format at construction.
//!    No bare strings for identifiers.
//!
//! 2. **Single `Value` union.** One recursive enum, exhaustive `match`
//!    everywhere. Adding a variant forces every transform to handle it.
//!
//! 3. **Single serialization path.** `Value` does not derive serde; the
//!    tagged-object codec in `vobj-wire` is the only way on and off the
//!    wire.
//!
//! 4. **Single-phase object construction.** `VoObject` takes its tag and
//!    inner state together. There is no allocate-empty-then-mutate step
//!    anywhere in the stack.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vobj-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod scalar;
pub mod tag;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use config::ViewConfig;
pub use error::VoError;
pub use scalar::{OpaqueId, Timestamp, OPAQUE_ID_LEN};
pub use tag::{TypeTag, DATE_KEY, OID_KEY, PROTOCOL_VERSION, VO_KEY_PREFIX};
pub use value::{Value, VoObject};
