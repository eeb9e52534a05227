//! Workflow services over store and persistence.
//!
//! # Responsibility
//! - Expose the add/delete/list workflow as stable entry points.
//! - Keep callers storage-agnostic behind the repository contract.

pub mod roster_service;
