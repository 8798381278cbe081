//! Version control abstraction consumed by the release orchestrator.
//!
//! The orchestrator only ever talks to a [`manager::VcsManager`], which
//! forwards to any [`traits::VersionControl`] implementation and applies the
//! dry-run guard in one place.

/// Dry-run aware wrapper around a version control client.
pub mod manager;

/// Common trait for version control clients.
pub mod traits;

/// Shared data types for commits and cherry-pick results.
pub mod types;
