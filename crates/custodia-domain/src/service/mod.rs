//! Responsibility grant orchestration.
//!
//! The service resolves role/permission selectors against the
//! collaborator stores, applies prerequisite side effects on the
//! owner's own role/permission assignments, then reads and writes
//! responsibility links through the storage layer.
//!
//! # Semantics carried from the existing deployment
//!
//! - `grant` processes targets independently; a failure on one target
//!   does not roll back links already written for earlier targets.
//! - `revoke` and the bulk revokes treat an unresolved role/permission
//!   name as a no-op, while `grant` and `has_responsibility` fail.
//!   Callers relying on revoke-by-name should be aware of the
//!   asymmetry.
//! - A link granted without a role or permission is stored with the
//!   unscoped sentinel and is only matched by equally-unscoped checks.

use std::sync::Arc;

use tracing::{debug, instrument};

use custodia_storage::{LinkFilter, ResponsibilityStore, StoredLink};

use crate::entity::{Entity, Owner};
use crate::error::{DomainError, DomainResult};
use crate::registry::EntityRegistry;
use crate::stores::{
    Permission, PermissionSelector, PermissionStore, Role, RoleSelector, RoleStore,
};

#[cfg(test)]
mod tests;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Guard used by operations whose public contract carries no guard
    /// argument (the bulk revokes).
    pub default_guard: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_guard: "web".to_string(),
        }
    }
}

/// Orchestrates responsibility grants over a [`ResponsibilityStore`].
pub struct ResponsibilityService<S> {
    store: Arc<S>,
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    registry: Arc<EntityRegistry>,
    config: ServiceConfig,
}

impl<S: ResponsibilityStore> ResponsibilityService<S> {
    /// Creates a new service with the default configuration.
    pub fn new(
        store: Arc<S>,
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        registry: Arc<EntityRegistry>,
    ) -> Self {
        Self {
            store,
            roles,
            permissions,
            registry,
            config: ServiceConfig::default(),
        }
    }

    /// Replaces the service configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// The target-kind registry backing this service.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Grants the owner responsibility over every target, optionally
    /// scoped by a role and/or permission.
    ///
    /// A scoping role or permission is resolved first (failing with
    /// `RoleNotFound`/`PermissionNotFound`), then assigned to the owner
    /// itself if not already held; an owner type without the matching
    /// capability fails with `UnsupportedCapability` before any link is
    /// written. Targets are then processed independently: one upserted
    /// link each, no rollback of earlier targets on failure.
    #[instrument(skip_all, fields(owner = %owner.kind(), guard))]
    pub async fn grant(
        &self,
        owner: &dyn Owner,
        targets: &[&dyn Entity],
        guard: &str,
        role: Option<&RoleSelector>,
        permission: Option<&PermissionSelector>,
    ) -> DomainResult<()> {
        let role = match role {
            Some(selector) => Some(self.ensure_role_held(owner, selector, guard).await?),
            None => None,
        };
        let permission = match permission {
            Some(selector) => Some(self.ensure_permission_held(owner, selector, guard).await?),
            None => None,
        };

        for target in targets {
            self.check_registered(target.kind())?;
            let link = self.link_for(owner, *target, role.as_ref(), permission.as_ref());
            self.store.upsert_link(&link).await?;
            debug!(target = %target.kind(), target_id = target.entity_id(), "granted responsibility");
        }
        Ok(())
    }

    /// Revokes the owner's responsibility over every target.
    ///
    /// Role/permission names that fail to resolve degrade that scope to
    /// unscoped rather than erroring; store failures still propagate.
    /// The owner's own role/permission assignments are left untouched.
    #[instrument(skip_all, fields(owner = %owner.kind(), guard))]
    pub async fn revoke(
        &self,
        owner: &dyn Owner,
        targets: &[&dyn Entity],
        guard: &str,
        role: Option<&RoleSelector>,
        permission: Option<&PermissionSelector>,
    ) -> DomainResult<()> {
        let role = match role {
            Some(selector) => self.resolve_role_lenient(selector, guard).await?,
            None => None,
        };
        let permission = match permission {
            Some(selector) => self.resolve_permission_lenient(selector, guard).await?,
            None => None,
        };

        for target in targets {
            self.check_registered(target.kind())?;
            let link = self.link_for(owner, *target, role.as_ref(), permission.as_ref());
            self.store.delete_link(&link).await?;
            debug!(target = %target.kind(), target_id = target.entity_id(), "revoked responsibility");
        }
        Ok(())
    }

    /// True iff the owner holds a responsibility link for the target
    /// under exactly the given scope. An unscoped query matches only
    /// unscoped links. Unlike `revoke`, an unresolved role/permission
    /// name is an error here.
    pub async fn has_responsibility(
        &self,
        owner: &dyn Owner,
        target: &dyn Entity,
        guard: &str,
        role: Option<&RoleSelector>,
        permission: Option<&PermissionSelector>,
    ) -> DomainResult<bool> {
        let role = match role {
            Some(selector) => Some(self.resolve_role(selector, guard).await?),
            None => None,
        };
        let permission = match permission {
            Some(selector) => Some(self.resolve_permission(selector, guard).await?),
            None => None,
        };

        self.check_registered(target.kind())?;
        let link = self.link_for(owner, target, role.as_ref(), permission.as_ref());
        Ok(self.store.link_exists(&link).await?)
    }

    /// Removes every link the owner holds under the given role, across
    /// all target kinds. An unresolved role name is a no-op. Returns
    /// the number of links removed. Resolution uses the configured
    /// default guard.
    #[instrument(skip_all, fields(owner = %owner.kind()))]
    pub async fn revoke_all_by_role(
        &self,
        owner: &dyn Owner,
        role: &RoleSelector,
    ) -> DomainResult<u64> {
        let role = match self
            .resolve_role_lenient(role, &self.config.default_guard)
            .await?
        {
            Some(role) => role,
            None => return Ok(0),
        };
        let removed = self
            .store
            .delete_links_by_role(owner.kind(), owner.entity_id(), role.id)
            .await?;
        debug!(role = %role.name, removed, "bulk revoked by role");
        Ok(removed)
    }

    /// Removes every link the owner holds under the given permission,
    /// across all target kinds. An unresolved permission name is a
    /// no-op. Returns the number of links removed.
    #[instrument(skip_all, fields(owner = %owner.kind()))]
    pub async fn revoke_all_by_permission(
        &self,
        owner: &dyn Owner,
        permission: &PermissionSelector,
    ) -> DomainResult<u64> {
        let permission = match self
            .resolve_permission_lenient(permission, &self.config.default_guard)
            .await?
        {
            Some(permission) => permission,
            None => return Ok(0),
        };
        let removed = self
            .store
            .delete_links_by_permission(owner.kind(), owner.entity_id(), permission.id)
            .await?;
        debug!(permission = %permission.name, removed, "bulk revoked by permission");
        Ok(removed)
    }

    /// Lists ids of targets of one registered kind the owner holds
    /// links for. A role/permission selector, when given, restricts the
    /// listing to links carrying that exact scope; when omitted, links
    /// of every scope are included. Ids are deduplicated and sorted.
    pub async fn targets_of_kind(
        &self,
        owner: &dyn Owner,
        kind: &str,
        guard: &str,
        role: Option<&RoleSelector>,
        permission: Option<&PermissionSelector>,
    ) -> DomainResult<Vec<i64>> {
        self.check_registered(kind)?;
        let role = match role {
            Some(selector) => Some(self.resolve_role(selector, guard).await?),
            None => None,
        };
        let permission = match permission {
            Some(selector) => Some(self.resolve_permission(selector, guard).await?),
            None => None,
        };

        let filter = LinkFilter {
            target_kind: Some(kind.to_string()),
            role_id: role.map(|r| r.id),
            permission_id: permission.map(|p| p.id),
            ..LinkFilter::for_owner(owner.kind(), owner.entity_id())
        };
        let mut ids: Vec<i64> = self
            .store
            .read_links(&filter)
            .await?
            .into_iter()
            .map(|link| link.target_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    fn check_registered(&self, kind: &str) -> DomainResult<()> {
        if !self.registry.is_registered(kind) {
            return Err(DomainError::UnknownTargetKind {
                kind: kind.to_string(),
            });
        }
        Ok(())
    }

    fn link_for(
        &self,
        owner: &dyn Owner,
        target: &dyn Entity,
        role: Option<&Role>,
        permission: Option<&Permission>,
    ) -> StoredLink {
        StoredLink::new(
            owner.kind(),
            owner.entity_id(),
            target.kind(),
            target.entity_id(),
            role.map(|r| r.id),
            permission.map(|p| p.id),
        )
    }

    async fn resolve_role(&self, selector: &RoleSelector, guard: &str) -> DomainResult<Role> {
        match selector {
            RoleSelector::Named(name) => self.roles.find_by_name(name, guard).await,
            RoleSelector::Resolved(role) => Ok(role.clone()),
        }
    }

    /// Lenient resolution: an unresolved name becomes `None` so the
    /// caller's scope degrades to unscoped. Other errors propagate.
    async fn resolve_role_lenient(
        &self,
        selector: &RoleSelector,
        guard: &str,
    ) -> DomainResult<Option<Role>> {
        match self.resolve_role(selector, guard).await {
            Ok(role) => Ok(Some(role)),
            Err(DomainError::RoleNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn resolve_permission(
        &self,
        selector: &PermissionSelector,
        guard: &str,
    ) -> DomainResult<Permission> {
        match selector {
            PermissionSelector::Named(name) => self.permissions.find_by_name(name, guard).await,
            PermissionSelector::Resolved(permission) => Ok(permission.clone()),
        }
    }

    async fn resolve_permission_lenient(
        &self,
        selector: &PermissionSelector,
        guard: &str,
    ) -> DomainResult<Option<Permission>> {
        match self.resolve_permission(selector, guard).await {
            Ok(permission) => Ok(Some(permission)),
            Err(DomainError::PermissionNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolves the role, then assigns it to the owner itself unless
    /// already held. Fails with `UnsupportedCapability` when the owner
    /// type cannot hold roles.
    async fn ensure_role_held(
        &self,
        owner: &dyn Owner,
        selector: &RoleSelector,
        guard: &str,
    ) -> DomainResult<Role> {
        let role = self.resolve_role(selector, guard).await?;
        let holder =
            owner
                .as_role_holder()
                .ok_or_else(|| DomainError::UnsupportedCapability {
                    owner_kind: owner.kind().to_string(),
                    capability: "roles".to_string(),
                })?;
        if !holder.has_role(&role, guard).await? {
            holder.assign_role(&role).await?;
        }
        Ok(role)
    }

    /// Symmetric to [`Self::ensure_role_held`] for permissions.
    async fn ensure_permission_held(
        &self,
        owner: &dyn Owner,
        selector: &PermissionSelector,
        guard: &str,
    ) -> DomainResult<Permission> {
        let permission = self.resolve_permission(selector, guard).await?;
        let holder =
            owner
                .as_permission_holder()
                .ok_or_else(|| DomainError::UnsupportedCapability {
                    owner_kind: owner.kind().to_string(),
                    capability: "permissions".to_string(),
                })?;
        if !holder.has_permission(&permission, guard).await? {
            holder.give_permission(&permission).await?;
        }
        Ok(permission)
    }
}
