//! # vobj-view — Field-Filtered Rendering of Domain Objects
//!
//! The outward-facing layer of the vobj stack. A request handler hands a
//! domain object to a [`View`], optionally narrows the field set, and gets
//! back either final client JSON or a tag-preserving value for embedding,
//! depending on the request's inner-mode signal.
//!
//! ```
//! use vobj_core::{TypeTag, Value, ViewConfig, VoObject};
//! use vobj_view::{RenderContext, Viewable};
//!
//! let tag = TypeTag::new("acme.orders", "OrderVO").unwrap();
//! let vo = VoObject::from_inner(
//!     tag,
//!     Value::Mapping(
//!         [("status".to_owned(), Value::from("open"))].into_iter().collect(),
//!     ),
//! );
//! let ctx = RenderContext::new(&ViewConfig::default());
//! let out = vo.view().include_fields(["status"]).render(&ctx).unwrap();
//! ```
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests and doc examples.

pub mod context;
pub mod view;

pub use context::{InnerMode, RenderContext};
pub use view::{RenderOutput, View, Viewable};
