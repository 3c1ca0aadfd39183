//! Target-kind registry.
//!
//! Maps an entity kind name to its Rust type, replacing runtime
//! method-name parsing with an explicit typed lookup. Service
//! operations refuse to touch links for kinds that were never
//! registered.

use std::any::TypeId;

use dashmap::DashMap;

use crate::entity::Entity;

/// Registry of known target kinds.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    by_kind: DashMap<String, TypeId>,
    by_type: DashMap<TypeId, String>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity type under its kind name. Re-registering the
    /// same kind replaces the previous mapping.
    pub fn register<T: Entity + 'static>(&self, kind: impl Into<String>) {
        let kind = kind.into();
        let type_id = TypeId::of::<T>();
        self.by_kind.insert(kind.clone(), type_id);
        self.by_type.insert(type_id, kind);
    }

    /// True iff the kind name has been registered.
    pub fn is_registered(&self, kind: &str) -> bool {
        self.by_kind.contains_key(kind)
    }

    /// The kind name registered for the entity type, if any.
    pub fn kind_for<T: Entity + 'static>(&self) -> Option<String> {
        self.by_type
            .get(&TypeId::of::<T>())
            .map(|k| k.value().clone())
    }

    /// All registered kind names, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.by_kind.iter().map(|e| e.key().clone()).collect();
        kinds.sort();
        kinds
    }
}
