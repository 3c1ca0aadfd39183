//! custodia-storage: Storage abstraction layer
//!
//! This crate provides the storage abstraction for custodia, including:
//! - ResponsibilityStore trait for link operations
//! - In-memory implementation for testing and embedding
//! - PostgreSQL implementation for production
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  custodia-storage                    │
//! ├──────────────────────────────────────────────────────┤
//! │  traits.rs   - ResponsibilityStore trait definition  │
//! │  memory.rs   - In-memory implementation              │
//! │  postgres.rs - PostgreSQL implementation             │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryResponsibilityStore;
pub use postgres::{PostgresConfig, PostgresResponsibilityStore};
pub use traits::{LinkFilter, ResponsibilityStore, StoredLink, TableConfig, UNSCOPED};
