//! Role/permission identities and their collaborator stores.
//!
//! Roles and permissions are owned by an external subsystem; this crate
//! only resolves a name+guard pair to an identity and references it by
//! numeric id afterwards.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;

/// A resolved role identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub guard: String,
}

/// A resolved permission identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub guard: String,
}

/// A role given either by name (resolved against the [`RoleStore`] at
/// call time) or as an already-resolved identity.
#[derive(Debug, Clone)]
pub enum RoleSelector {
    Named(String),
    Resolved(Role),
}

impl From<&str> for RoleSelector {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for RoleSelector {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Role> for RoleSelector {
    fn from(role: Role) -> Self {
        Self::Resolved(role)
    }
}

/// A permission given by name or as a resolved identity.
#[derive(Debug, Clone)]
pub enum PermissionSelector {
    Named(String),
    Resolved(Permission),
}

impl From<&str> for PermissionSelector {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for PermissionSelector {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Permission> for PermissionSelector {
    fn from(permission: Permission) -> Self {
        Self::Resolved(permission)
    }
}

/// Resolves role names within a guard.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Resolves a name+guard pair to a unique role.
    /// Fails with [`DomainError::RoleNotFound`] if no role matches.
    ///
    /// [`DomainError::RoleNotFound`]: crate::error::DomainError::RoleNotFound
    async fn find_by_name(&self, name: &str, guard: &str) -> DomainResult<Role>;
}

/// Resolves permission names within a guard.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Resolves a name+guard pair to a unique permission.
    /// Fails with [`DomainError::PermissionNotFound`] if no permission matches.
    ///
    /// [`DomainError::PermissionNotFound`]: crate::error::DomainError::PermissionNotFound
    async fn find_by_name(&self, name: &str, guard: &str) -> DomainResult<Permission>;
}
