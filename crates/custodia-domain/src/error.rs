//! Domain error types for responsibility operations.

use thiserror::Error;

use custodia_storage::StorageError;

/// Domain-specific errors for responsibility operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Role name did not resolve where resolution is mandatory.
    #[error("role not found: '{name}' under guard '{guard}'")]
    RoleNotFound { name: String, guard: String },

    /// Permission name did not resolve where resolution is mandatory.
    #[error("permission not found: '{name}' under guard '{guard}'")]
    PermissionNotFound { name: String, guard: String },

    /// Owner type cannot hold the requested capability.
    #[error("owner kind '{owner_kind}' cannot hold {capability}")]
    UnsupportedCapability {
        owner_kind: String,
        capability: String,
    },

    /// Target kind is not registered in the entity registry.
    #[error("unknown target kind: '{kind}'")]
    UnknownTargetKind { kind: String },

    /// Failure in an owner's own role/permission assignment.
    #[error("assignment error: {message}")]
    AssignmentError { message: String },

    /// Storage-level failure, propagated unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
