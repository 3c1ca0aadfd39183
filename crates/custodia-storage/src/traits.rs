//! ResponsibilityStore trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Sentinel stored in the role/permission columns of an unscoped link.
///
/// Links written without a role (or permission) carry `0` in the
/// corresponding column so that every lookup is a plain equality
/// predicate. An unscoped grant is only ever matched by an equally
/// unscoped query.
pub const UNSCOPED: i64 = 0;

/// Maximum length of a kind identifier (matches typical morph-type
/// column width in existing join tables).
const MAX_KIND_LEN: usize = 255;

/// A stored responsibility link: one row of the polymorphic join table.
///
/// The row represents "owner entity holds responsibility for target
/// entity", optionally scoped by a role and/or a permission. Role and
/// permission columns use the [`UNSCOPED`] sentinel rather than NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredLink {
    pub owner_kind: String,
    pub owner_id: i64,
    pub target_kind: String,
    pub target_id: i64,
    pub role_id: i64,
    pub permission_id: i64,
}

impl StoredLink {
    /// Creates a new link. `role_id`/`permission_id` of `None` become
    /// the unscoped sentinel.
    pub fn new(
        owner_kind: impl Into<String>,
        owner_id: i64,
        target_kind: impl Into<String>,
        target_id: i64,
        role_id: Option<i64>,
        permission_id: Option<i64>,
    ) -> Self {
        Self {
            owner_kind: owner_kind.into(),
            owner_id,
            target_kind: target_kind.into(),
            target_id,
            role_id: role_id.unwrap_or(UNSCOPED),
            permission_id: permission_id.unwrap_or(UNSCOPED),
        }
    }
}

/// Filter for reading links. Unset fields match everything; set
/// role/permission fields match by exact sentinel equality, so
/// `Some(UNSCOPED)` selects unscoped links specifically.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    pub owner_kind: Option<String>,
    pub owner_id: Option<i64>,
    pub target_kind: Option<String>,
    pub target_id: Option<i64>,
    pub role_id: Option<i64>,
    pub permission_id: Option<i64>,
}

impl LinkFilter {
    /// Filter for every link held by one owner.
    pub fn for_owner(owner_kind: impl Into<String>, owner_id: i64) -> Self {
        Self {
            owner_kind: Some(owner_kind.into()),
            owner_id: Some(owner_id),
            ..Default::default()
        }
    }

    /// True when the link matches every set predicate.
    pub fn matches(&self, link: &StoredLink) -> bool {
        self.owner_kind
            .as_ref()
            .map_or(true, |k| &link.owner_kind == k)
            && self.owner_id.map_or(true, |id| link.owner_id == id)
            && self
                .target_kind
                .as_ref()
                .map_or(true, |k| &link.target_kind == k)
            && self.target_id.map_or(true, |id| link.target_id == id)
            && self.role_id.map_or(true, |id| link.role_id == id)
            && self
                .permission_id
                .map_or(true, |id| link.permission_id == id)
    }
}

/// Names of the join table and its morph-key columns.
///
/// The table layout is shared with pre-existing deployments, so the
/// table name and the two id columns are configuration rather than
/// constants. The companion columns (`model_type`, `entity_model_type`,
/// `role_id`, `permission_id`) are fixed.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Name of the join table.
    pub table_name: String,
    /// Column storing the owner's id.
    pub owner_morph_key: String,
    /// Column storing the target's id.
    pub target_morph_key: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_name: "model_has_responsibilities".to_string(),
            owner_morph_key: "model_id".to_string(),
            target_morph_key: "entity_id".to_string(),
        }
    }
}

impl TableConfig {
    /// Validates the configured identifiers so they can be interpolated
    /// into SQL safely (bind parameters cannot carry identifiers).
    pub fn validate(&self) -> StorageResult<()> {
        for name in [&self.table_name, &self.owner_morph_key, &self.target_morph_key] {
            validate_identifier(name)?;
        }
        if self.owner_morph_key == self.target_morph_key {
            return Err(StorageError::InvalidConfig {
                message: "owner and target morph key columns must differ".to_string(),
            });
        }
        Ok(())
    }
}

/// Validates a SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`, bounded length.
pub fn validate_identifier(name: &str) -> StorageResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid || name.len() > MAX_KIND_LEN {
        return Err(StorageError::InvalidConfig {
            message: format!("invalid SQL identifier: {name:?}"),
        });
    }
    Ok(())
}

/// Validates an entity kind string.
pub fn validate_kind(kind: &str) -> StorageResult<()> {
    if kind.is_empty() {
        return Err(StorageError::InvalidInput {
            message: "entity kind cannot be empty".to_string(),
        });
    }
    if kind.len() > MAX_KIND_LEN {
        return Err(StorageError::InvalidInput {
            message: format!("entity kind exceeds {MAX_KIND_LEN} bytes: {kind:?}"),
        });
    }
    Ok(())
}

/// Validates a full link before it is written or matched.
pub fn validate_link(link: &StoredLink) -> StorageResult<()> {
    validate_kind(&link.owner_kind)?;
    validate_kind(&link.target_kind)?;
    for (field, value) in [
        ("owner_id", link.owner_id),
        ("target_id", link.target_id),
        ("role_id", link.role_id),
        ("permission_id", link.permission_id),
    ] {
        if value < 0 {
            return Err(StorageError::InvalidInput {
                message: format!("{field} cannot be negative: {value}"),
            });
        }
    }
    Ok(())
}

/// Abstract storage interface for responsibility links.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations. Each call is an independent statement against the
/// store; the store's native concurrency control governs isolation.
#[async_trait]
pub trait ResponsibilityStore: Send + Sync + 'static {
    /// Inserts the link if the exact tuple is not already present.
    /// An existing identical row is left unchanged (idempotent).
    async fn upsert_link(&self, link: &StoredLink) -> StorageResult<()>;

    /// Deletes the link matching the exact tuple. Zero matching rows
    /// is not an error.
    async fn delete_link(&self, link: &StoredLink) -> StorageResult<()>;

    /// True iff a link matching the exact tuple exists.
    async fn link_exists(&self, link: &StoredLink) -> StorageResult<bool>;

    /// Deletes every link for the owner scoped to the given role,
    /// across all target kinds. Returns the number of rows removed.
    async fn delete_links_by_role(
        &self,
        owner_kind: &str,
        owner_id: i64,
        role_id: i64,
    ) -> StorageResult<u64>;

    /// Deletes every link for the owner scoped to the given permission,
    /// across all target kinds. Returns the number of rows removed.
    async fn delete_links_by_permission(
        &self,
        owner_kind: &str,
        owner_id: i64,
        permission_id: i64,
    ) -> StorageResult<u64>;

    /// Reads links matching the filter.
    async fn read_links(&self, filter: &LinkFilter) -> StorageResult<Vec<StoredLink>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscoped_constructor_uses_sentinel() {
        let link = StoredLink::new("user", 1, "project", 7, None, None);
        assert_eq!(link.role_id, UNSCOPED);
        assert_eq!(link.permission_id, UNSCOPED);
    }

    #[test]
    fn filter_matches_on_set_fields_only() {
        let link = StoredLink::new("user", 1, "project", 7, Some(3), None);

        let mut filter = LinkFilter::for_owner("user", 1);
        assert!(filter.matches(&link));

        filter.role_id = Some(3);
        assert!(filter.matches(&link));

        filter.role_id = Some(UNSCOPED);
        assert!(!filter.matches(&link));

        let other_owner = LinkFilter::for_owner("team", 1);
        assert!(!other_owner.matches(&link));
    }

    #[test]
    fn identifier_validation_rejects_injection() {
        assert!(validate_identifier("model_has_responsibilities").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1table").is_err());
        assert!(validate_identifier("t; DROP TABLE x").is_err());
        assert!(validate_identifier("col-name").is_err());
    }

    #[test]
    fn table_config_rejects_duplicate_morph_keys() {
        let config = TableConfig {
            owner_morph_key: "model_id".to_string(),
            target_morph_key: "model_id".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StorageError::InvalidConfig { .. })
        ));
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn link_validation_rejects_bad_input() {
        assert!(validate_link(&StoredLink::new("user", 1, "project", 7, None, None)).is_ok());
        assert!(validate_link(&StoredLink::new("", 1, "project", 7, None, None)).is_err());
        assert!(validate_link(&StoredLink::new("user", -1, "project", 7, None, None)).is_err());
        assert!(
            validate_link(&StoredLink::new("user", 1, "project", 7, Some(-2), None)).is_err()
        );
    }
}
