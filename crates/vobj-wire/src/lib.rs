//! # vobj-wire — Wire Protocol for the vobj Stack
//!
//! Three pieces, layered over `vobj-core`:
//!
//! - [`registry`] — the explicit, frozen catalog mapping wire tags to
//!   domain-object constructors. Built once at startup, shared immutably.
//! - [`codec`] — the type-tagged encode/decode protocol over a JSON
//!   substrate. Round-trips domain objects, timestamps, and identifiers
//!   without losing type identity.
//! - [`normalize`] — the final, lossy-by-design conversion to client-facing
//!   JSON. Never fails; no wire marker survives it.
//!
//! ## Concurrency
//!
//! Everything here is a pure, synchronous transform over an in-memory tree.
//! A frozen [`TagRegistry`] may be shared across any number of concurrent
//! decode calls without locking; no state is retained across calls.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Recursion is depth-bounded in the codec ([`codec::MAX_DEPTH`]).

pub mod codec;
pub mod normalize;
pub mod registry;

pub use codec::{decode, encode, from_json_text, to_json_text, MAX_DEPTH};
pub use normalize::{normalize, NormalizeOptions};
pub use registry::{TagRegistry, TagRegistryBuilder, VoFactory};
