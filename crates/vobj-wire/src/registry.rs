//! # Tag Registry — Explicit, Frozen Type Catalog
//!
//! Maps wire tags to constructors for the closed set of domain-object
//! types. Registration happens once, explicitly, during service startup;
//! `build()` freezes the catalog into an immutable registry that decode
//! calls borrow. There is no ambient global state and no reflective module
//! scanning — the type set is auditable at the registration site.
//!
//! ## Concurrency
//!
//! The builder-then-freeze split is the initialization barrier: a
//! `TagRegistry` is immutable and `Send + Sync`, so any number of decode
//! calls may share it without locking. Registration strictly precedes
//! first use by construction.

use std::collections::HashMap;
use std::sync::Arc;

use vobj_core::{TypeTag, Value, VoError, VoObject};

/// A `fromInner`-style constructor: builds a complete instance from the
/// decoded inner value in one step.
pub type VoFactory = Arc<dyn Fn(Option<Value>) -> VoObject + Send + Sync>;

/// Accumulates registrations before the registry is frozen.
#[derive(Default)]
pub struct TagRegistryBuilder {
    factories: HashMap<String, VoFactory>,
}

impl TagRegistryBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with the default factory, which wraps the decoded
    /// inner value in a `VoObject` carrying this tag.
    pub fn register(self, tag: TypeTag) -> Self {
        let factory_tag = tag.clone();
        self.register_with(
            tag,
            Arc::new(move |inner| VoObject::new(factory_tag.clone(), inner)),
        )
    }

    /// Register a type with a custom factory. A later registration for the
    /// same tag replaces the earlier one.
    pub fn register_with(mut self, tag: TypeTag, factory: VoFactory) -> Self {
        self.factories.insert(tag.registry_key(), factory);
        self
    }

    /// Freeze the catalog. No further registration is possible.
    pub fn build(self) -> TagRegistry {
        TagRegistry {
            factories: self.factories,
        }
    }
}

/// The frozen tag catalog consulted on every decode.
pub struct TagRegistry {
    factories: HashMap<String, VoFactory>,
}

impl TagRegistry {
    /// Resolve a tag to its registered factory.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` for a tag that was never registered. The
    /// caller must abort decoding of the subtree — data is never silently
    /// dropped.
    pub fn resolve(&self, tag: &TypeTag) -> Result<&VoFactory, VoError> {
        self.factories
            .get(&tag.registry_key())
            .ok_or_else(|| VoError::UnknownType(tag.registry_key()))
    }

    /// True if the tag has a registered factory.
    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.factories.contains_key(&tag.registry_key())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry")
            .field("types", &self.factories.len())
            .finish()
    }
}
