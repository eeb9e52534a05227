//! Persistence boundary for the roster file.
//!
//! # Responsibility
//! - Define the repository contract used by the workflow service.
//! - Keep file-format and I/O details inside this module.
//!
//! # Invariants
//! - Saves replace the whole file atomically; a failed save never
//!   corrupts the previous content.
//! - Loads never fail the session: missing and malformed files fall
//!   back to an empty roster, with malformed content set aside.

pub mod json_file;
