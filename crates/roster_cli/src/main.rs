//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `roster_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use roster_core::{JsonFileRepository, RosterService};

fn main() {
    println!("roster_core version={}", roster_core::core_version());

    let repo = JsonFileRepository::new(JsonFileRepository::default_path());
    let (service, fallback) = RosterService::open(repo);
    if let Some(fallback) = fallback {
        eprintln!("roster load fallback: {}", fallback.reason);
    }
    println!("roster records={}", service.len());
}
