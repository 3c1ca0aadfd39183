//! custodia-domain: Responsibility grant orchestration
//!
//! This crate contains the domain logic for polymorphic responsibility
//! grants, including:
//! - Entity identity and owner capability traits
//! - Role/permission collaborator contracts
//! - Target-kind registry
//! - The ResponsibilityService orchestration layer
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   custodia-domain                    │
//! ├──────────────────────────────────────────────────────┤
//! │  entity.rs   - Entity & owner capability traits      │
//! │  stores.rs   - Role/permission collaborator traits   │
//! │  registry.rs - Target-kind registry                  │
//! │  service/    - Grant/revoke/check orchestration      │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod registry;
pub mod service;
pub mod stores;

// Re-export commonly used types at the crate root
pub use entity::{Entity, Owner, PermissionHolder, RoleHolder};
pub use error::{DomainError, DomainResult};
pub use registry::EntityRegistry;
pub use service::{ResponsibilityService, ServiceConfig};
pub use stores::{Permission, PermissionSelector, PermissionStore, Role, RoleSelector, RoleStore};
