//! Mock implementations for service testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entity::{Entity, Owner, PermissionHolder, RoleHolder};
use crate::error::{DomainError, DomainResult};
use crate::stores::{Permission, PermissionStore, Role, RoleStore};

/// Mock role store backed by a name+guard map.
pub struct MockRoleStore {
    roles: RwLock<HashMap<(String, String), Role>>,
}

impl MockRoleStore {
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_role(&self, id: i64, name: &str, guard: &str) -> Role {
        let role = Role {
            id,
            name: name.to_string(),
            guard: guard.to_string(),
        };
        self.roles
            .write()
            .await
            .insert((name.to_string(), guard.to_string()), role.clone());
        role
    }
}

#[async_trait]
impl RoleStore for MockRoleStore {
    async fn find_by_name(&self, name: &str, guard: &str) -> DomainResult<Role> {
        self.roles
            .read()
            .await
            .get(&(name.to_string(), guard.to_string()))
            .cloned()
            .ok_or_else(|| DomainError::RoleNotFound {
                name: name.to_string(),
                guard: guard.to_string(),
            })
    }
}

/// Mock permission store backed by a name+guard map.
pub struct MockPermissionStore {
    permissions: RwLock<HashMap<(String, String), Permission>>,
}

impl MockPermissionStore {
    pub fn new() -> Self {
        Self {
            permissions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_permission(&self, id: i64, name: &str, guard: &str) -> Permission {
        let permission = Permission {
            id,
            name: name.to_string(),
            guard: guard.to_string(),
        };
        self.permissions
            .write()
            .await
            .insert((name.to_string(), guard.to_string()), permission.clone());
        permission
    }
}

#[async_trait]
impl PermissionStore for MockPermissionStore {
    async fn find_by_name(&self, name: &str, guard: &str) -> DomainResult<Permission> {
        self.permissions
            .read()
            .await
            .get(&(name.to_string(), guard.to_string()))
            .cloned()
            .ok_or_else(|| DomainError::PermissionNotFound {
                name: name.to_string(),
                guard: guard.to_string(),
            })
    }
}

/// Owner with both capabilities; tracks its own role/permission sets
/// and counts assignment calls so tests can assert side effects.
pub struct TestUser {
    pub id: i64,
    roles: RwLock<HashSet<i64>>,
    permissions: RwLock<HashSet<i64>>,
    pub role_assignments: AtomicU32,
    pub permission_assignments: AtomicU32,
}

impl TestUser {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            roles: RwLock::new(HashSet::new()),
            permissions: RwLock::new(HashSet::new()),
            role_assignments: AtomicU32::new(0),
            permission_assignments: AtomicU32::new(0),
        }
    }

    pub async fn holds_role(&self, role_id: i64) -> bool {
        self.roles.read().await.contains(&role_id)
    }

    pub async fn holds_permission(&self, permission_id: i64) -> bool {
        self.permissions.read().await.contains(&permission_id)
    }
}

impl Entity for TestUser {
    fn kind(&self) -> &str {
        "user"
    }

    fn entity_id(&self) -> i64 {
        self.id
    }
}

#[async_trait]
impl RoleHolder for TestUser {
    async fn has_role(&self, role: &Role, _guard: &str) -> DomainResult<bool> {
        Ok(self.roles.read().await.contains(&role.id))
    }

    async fn assign_role(&self, role: &Role) -> DomainResult<()> {
        self.role_assignments.fetch_add(1, Ordering::SeqCst);
        self.roles.write().await.insert(role.id);
        Ok(())
    }
}

#[async_trait]
impl PermissionHolder for TestUser {
    async fn has_permission(&self, permission: &Permission, _guard: &str) -> DomainResult<bool> {
        Ok(self.permissions.read().await.contains(&permission.id))
    }

    async fn give_permission(&self, permission: &Permission) -> DomainResult<()> {
        self.permission_assignments.fetch_add(1, Ordering::SeqCst);
        self.permissions.write().await.insert(permission.id);
        Ok(())
    }
}

impl Owner for TestUser {
    fn as_role_holder(&self) -> Option<&dyn RoleHolder> {
        Some(self)
    }

    fn as_permission_holder(&self) -> Option<&dyn PermissionHolder> {
        Some(self)
    }
}

/// Owner without either capability.
pub struct ApiClient {
    pub id: i64,
}

impl Entity for ApiClient {
    fn kind(&self) -> &str {
        "api_client"
    }

    fn entity_id(&self) -> i64 {
        self.id
    }
}

impl Owner for ApiClient {}

/// Target entity.
pub struct Project {
    pub id: i64,
}

impl Entity for Project {
    fn kind(&self) -> &str {
        "project"
    }

    fn entity_id(&self) -> i64 {
        self.id
    }
}

/// Second target kind for cross-kind assertions.
pub struct Document {
    pub id: i64,
}

impl Entity for Document {
    fn kind(&self) -> &str {
        "document"
    }

    fn entity_id(&self) -> i64 {
        self.id
    }
}

/// Target kind that tests deliberately leave unregistered.
pub struct Invoice {
    pub id: i64,
}

impl Entity for Invoice {
    fn kind(&self) -> &str {
        "invoice"
    }

    fn entity_id(&self) -> i64 {
        self.id
    }
}
