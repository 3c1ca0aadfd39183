//! Tests for the responsibility service.
//!
//! Organized by functionality:
//! - Grant/revoke/check round-trips
//! - Scoping (role, permission, unscoped sentinel)
//! - Capability guards and owner side effects
//! - Bulk revocation
//! - Target-kind registry enforcement

mod mocks;
