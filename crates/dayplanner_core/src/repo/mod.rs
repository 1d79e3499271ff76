//! Persistence collaborators for the day-record store.
//!
//! # Responsibility
//! - Define the named-blob persistence contract the store depends on.
//! - Isolate SQLite details from store logic.
//!
//! # Invariants
//! - Repository failures are surfaced as `RepoError`; the store never
//!   invents storage errors of its own.

pub mod snapshot_repo;
