//! In-memory storage implementation for testing and embedding.
//!
//! Uses a `DashSet<StoredLink>` for O(1) upsert/delete/exists without
//! client-side locking. Filtered reads are a linear scan, which is the
//! same trade-off the relational backend makes without an index.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;

use crate::error::StorageResult;
use crate::traits::{validate_kind, validate_link, LinkFilter, ResponsibilityStore, StoredLink};

/// In-memory implementation of ResponsibilityStore.
#[derive(Debug, Default)]
pub struct MemoryResponsibilityStore {
    links: DashSet<StoredLink>,
}

impl MemoryResponsibilityStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Total number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no links are stored.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl ResponsibilityStore for MemoryResponsibilityStore {
    async fn upsert_link(&self, link: &StoredLink) -> StorageResult<()> {
        validate_link(link)?;
        // DashSet::insert is a no-op on duplicates (idempotent).
        self.links.insert(link.clone());
        Ok(())
    }

    async fn delete_link(&self, link: &StoredLink) -> StorageResult<()> {
        validate_link(link)?;
        self.links.remove(link);
        Ok(())
    }

    async fn link_exists(&self, link: &StoredLink) -> StorageResult<bool> {
        validate_link(link)?;
        Ok(self.links.contains(link))
    }

    async fn delete_links_by_role(
        &self,
        owner_kind: &str,
        owner_id: i64,
        role_id: i64,
    ) -> StorageResult<u64> {
        validate_kind(owner_kind)?;
        let mut removed = 0u64;
        self.links.retain(|l| {
            let matches = l.owner_kind == owner_kind && l.owner_id == owner_id && l.role_id == role_id;
            if matches {
                removed += 1;
            }
            !matches
        });
        Ok(removed)
    }

    async fn delete_links_by_permission(
        &self,
        owner_kind: &str,
        owner_id: i64,
        permission_id: i64,
    ) -> StorageResult<u64> {
        validate_kind(owner_kind)?;
        let mut removed = 0u64;
        self.links.retain(|l| {
            let matches = l.owner_kind == owner_kind
                && l.owner_id == owner_id
                && l.permission_id == permission_id;
            if matches {
                removed += 1;
            }
            !matches
        });
        Ok(removed)
    }

    async fn read_links(&self, filter: &LinkFilter) -> StorageResult<Vec<StoredLink>> {
        let mut links: Vec<StoredLink> = self
            .links
            .iter()
            .filter(|l| filter.matches(l.key()))
            .map(|l| l.key().clone())
            .collect();
        // Deterministic order for callers that compare result sets.
        links.sort_by(|a, b| {
            (
                &a.owner_kind,
                a.owner_id,
                &a.target_kind,
                a.target_id,
                a.role_id,
                a.permission_id,
            )
                .cmp(&(
                    &b.owner_kind,
                    b.owner_id,
                    &b.target_kind,
                    b.target_id,
                    b.role_id,
                    b.permission_id,
                ))
        });
        Ok(links)
    }
}
