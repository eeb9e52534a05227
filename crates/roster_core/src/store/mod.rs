//! In-memory record storage.
//!
//! # Responsibility
//! - Own the session's ordered list of roster records.
//! - Provide read-only projections for the presentation layer.
//!
//! # Invariants
//! - The store is the single source of truth while the process runs.
//! - Insertion order is preserved; no sorting or dedup happens here.

pub mod record_store;
