//! Entity identity and owner capability traits.
//!
//! Capability probing is static: an owner type that can hold roles
//! overrides [`Owner::as_role_holder`] to return itself. The service
//! checks these accessors at runtime instead of assuming every owner
//! supports both capabilities.

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::stores::{Permission, Role};

/// An entity that can appear on either side of a responsibility link,
/// identified by a kind string and a numeric id.
pub trait Entity: Send + Sync {
    /// The entity's kind identifier (the morph-type value, e.g. "user"
    /// or "project").
    fn kind(&self) -> &str;

    /// The entity's id within its kind.
    fn entity_id(&self) -> i64;
}

/// An owner type that can hold roles directly.
#[async_trait]
pub trait RoleHolder: Send + Sync {
    /// True iff the owner already holds the role under the guard.
    async fn has_role(&self, role: &Role, guard: &str) -> DomainResult<bool>;

    /// Adds the role to the owner's own role set. Cumulative; existing
    /// roles are never removed.
    async fn assign_role(&self, role: &Role) -> DomainResult<()>;
}

/// An owner type that can hold permissions directly.
#[async_trait]
pub trait PermissionHolder: Send + Sync {
    /// True iff the owner already holds the permission under the guard.
    async fn has_permission(&self, permission: &Permission, guard: &str) -> DomainResult<bool>;

    /// Adds the permission to the owner's own permission set.
    async fn give_permission(&self, permission: &Permission) -> DomainResult<()>;
}

/// An entity that can be granted responsibilities.
///
/// The default accessors declare no capabilities; owner types opt in by
/// overriding the accessor for each capability they implement:
///
/// ```ignore
/// impl Owner for User {
///     fn as_role_holder(&self) -> Option<&dyn RoleHolder> {
///         Some(self)
///     }
/// }
/// ```
pub trait Owner: Entity {
    /// The owner's role-holding capability, if it has one.
    fn as_role_holder(&self) -> Option<&dyn RoleHolder> {
        None
    }

    /// The owner's permission-holding capability, if it has one.
    fn as_permission_holder(&self) -> Option<&dyn PermissionHolder> {
        None
    }
}
