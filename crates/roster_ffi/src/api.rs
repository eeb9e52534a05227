//! FFI use-case API for the roster UI.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to the UI toolkit.
//! - Keep the grid's contract simple: re-fetch a full snapshot after
//!   every mutation; no live two-way binding.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The process-wide service is loaded once, on first use, and every
//!   mutation goes through its single-writer lock.

use roster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AddStudentRequest,
    JsonFileRepository, RosterService, Student,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const DATA_PATH_ENV: &str = "ROSTER_DATA_PATH";

static ROSTER: OnceLock<Mutex<RosterState>> = OnceLock::new();

struct RosterState {
    service: RosterService<JsonFileRepository>,
    /// Startup load fallback, surfaced once through the first snapshot.
    startup_warning: Option<String>,
}

/// Expose the core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; reconfiguration fails.
/// - Never panics; returns empty string on success and an error message
///   on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One grid row in the roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterItem {
    pub first_name: String,
    pub last_name: String,
    pub census_id: i64,
    pub cell_phone_number: String,
    pub degree_pursued: String,
}

/// Snapshot envelope for the grid view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshotResponse {
    /// Records in insertion order; the grid rebuilds fully from this.
    pub items: Vec<RosterItem>,
    /// Human-readable diagnostics (startup fallback, counts).
    pub message: String,
}

/// Action envelope for add/delete operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable response message for dialogs/diagnostics.
    pub message: String,
}

impl RosterActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Returns a fresh projection of the roster for the grid.
///
/// # FFI contract
/// - Sync call; loads the roster file on first use only.
/// - Never panics.
/// - The first snapshot after a startup load fallback carries the
///   fallback message.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_snapshot() -> RosterSnapshotResponse {
    let mut state = lock_roster();
    let items: Vec<RosterItem> = state.service.list().iter().map(to_item).collect();
    let message = match state.startup_warning.take() {
        Some(warning) => warning,
        None => format!("{} record(s).", items.len()),
    };
    RosterSnapshotResponse { items, message }
}

/// Adds a student from the five form inputs.
///
/// # FFI contract
/// - Sync call; persists before the in-memory roster changes.
/// - Never panics.
/// - On failure nothing is mutated and the message names the cause.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_add(
    first_name: String,
    last_name: String,
    census_id: String,
    cell_phone_number: String,
    degree_pursued: String,
) -> RosterActionResponse {
    let request = AddStudentRequest {
        first_name,
        last_name,
        census_id,
        cell_phone_number,
        degree_pursued,
    };
    let mut state = lock_roster();
    match state.service.add(&request) {
        Ok(student) => RosterActionResponse::success(format!("Added {}.", student.full_name())),
        Err(err) => RosterActionResponse::failure(err.to_string()),
    }
}

/// Text for the yes/no confirmation dialog naming the selected student.
///
/// # FFI contract
/// - Sync call, read-only.
/// - Returns an empty string when `row` selects nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_confirm_message(row: u32) -> String {
    let state = lock_roster();
    match state.service.get(row as usize) {
        Some(student) => format!("Are you sure you want to delete {}?", student.full_name()),
        None => String::new(),
    }
}

/// Deletes the student at `row`. Called only after the UI's
/// confirmation dialog was answered with yes.
///
/// # FFI contract
/// - Sync call; persists before the in-memory roster changes.
/// - Never panics.
/// - An out-of-range row is a selection error, not a crash.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_delete(row: u32) -> RosterActionResponse {
    let mut state = lock_roster();
    match state.service.delete_at(row as usize) {
        Ok(student) => RosterActionResponse::success(format!("Deleted {}.", student.full_name())),
        Err(err) => RosterActionResponse::failure(err.to_string()),
    }
}

fn lock_roster() -> std::sync::MutexGuard<'static, RosterState> {
    ROSTER
        .get_or_init(|| {
            let repo = JsonFileRepository::new(resolve_data_path());
            let (service, fallback) = RosterService::open(repo);
            Mutex::new(RosterState {
                service,
                startup_warning: fallback.map(|f| f.reason),
            })
        })
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn resolve_data_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DATA_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    JsonFileRepository::default_path()
}

fn to_item(student: &Student) -> RosterItem {
    RosterItem {
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
        census_id: student.census_id,
        cell_phone_number: student.cell_phone_number.clone(),
        degree_pursued: student.degree_pursued.clone(),
    }
}
