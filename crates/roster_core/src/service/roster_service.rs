//! Roster workflow service.
//!
//! # Responsibility
//! - Drive the Idle -> Validating -> Persisting -> Idle workflow over
//!   the record store and a repository implementation.
//! - Load the roster once at startup and persist after every mutation.
//!
//! # Invariants
//! - The phase always returns to `Idle` when an operation ends, success
//!   or failure.
//! - Mutations commit to memory only after the save succeeds, so memory
//!   and disk cannot silently diverge.
//! - Service APIs never bypass validation or persistence contracts.

use crate::model::student::Student;
use crate::persist::json_file::{LoadFallback, PersistError, StudentRepository};
use crate::store::record_store::RecordStore;
use crate::validation::{self, AddStudentRequest, ValidationError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Observable workflow state. Operations are synchronous, so callers
/// only ever see `Idle` between calls; the intermediate phases exist
/// for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Validating,
    Persisting,
}

impl WorkflowPhase {
    fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Persisting => "persisting",
        }
    }
}

/// Workflow error reported to the user. Terminal to the current
/// operation only.
#[derive(Debug)]
pub enum RosterError {
    /// Form input failed validation; no mutation occurred.
    Input(ValidationError),
    /// Delete was requested without a valid row selection.
    NoSelection { index: usize, len: usize },
    /// Persistence failed; the in-memory roster is unchanged.
    Persist(PersistError),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::NoSelection { index, len } => {
                write!(f, "no valid selection: row {index} of {len}")
            }
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::NoSelection { .. } => None,
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RosterError {
    fn from(value: ValidationError) -> Self {
        Self::Input(value)
    }
}

impl From<PersistError> for RosterError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Workflow facade over the record store and a repository.
pub struct RosterService<R: StudentRepository> {
    repo: R,
    store: RecordStore,
    phase: WorkflowPhase,
}

impl<R: StudentRepository> RosterService<R> {
    /// Loads the roster once and starts the session.
    ///
    /// Any load failure is reported through the returned fallback and
    /// the session starts empty; startup never fails.
    pub fn open(repo: R) -> (Self, Option<LoadFallback>) {
        let (records, fallback) = match repo.load() {
            Ok(report) => (report.records, report.fallback),
            Err(err) => {
                error!(
                    "event=roster_open module=service status=error error={}",
                    err
                );
                (
                    Vec::new(),
                    Some(LoadFallback {
                        reason: format!("roster load failed: {err}"),
                        set_aside: None,
                    }),
                )
            }
        };

        info!(
            "event=roster_open module=service status=ok count={} fallback={}",
            records.len(),
            fallback.is_some()
        );

        let service = Self {
            repo,
            store: RecordStore::from_records(records),
            phase: WorkflowPhase::Idle,
        };
        (service, fallback)
    }

    /// Validates form input, persists the grown list, then commits it
    /// to the store.
    pub fn add(&mut self, request: &AddStudentRequest) -> Result<Student, RosterError> {
        self.enter(WorkflowPhase::Validating, "add");
        let student = match validation::validate(request) {
            Ok(student) => student,
            Err(err) => {
                warn!(
                    "event=roster_add module=service status=rejected error={}",
                    err
                );
                self.enter(WorkflowPhase::Idle, "add");
                return Err(err.into());
            }
        };

        self.enter(WorkflowPhase::Persisting, "add");
        let mut next = self.store.snapshot();
        next.push(student.clone());
        match self.repo.save(&next) {
            Ok(()) => {
                self.store.add(student.clone());
                self.enter(WorkflowPhase::Idle, "add");
                info!(
                    "event=roster_add module=service status=ok census_id={} count={}",
                    student.census_id,
                    self.store.len()
                );
                Ok(student)
            }
            Err(err) => {
                self.enter(WorkflowPhase::Idle, "add");
                Err(err.into())
            }
        }
    }

    /// Deletes the record at `index`, persisting the shrunken list
    /// before committing. Confirmation dialogs live in the UI; this is
    /// called only after an affirmative answer.
    pub fn delete_at(&mut self, index: usize) -> Result<Student, RosterError> {
        let len = self.store.len();
        let Some(victim) = self.store.get(index).cloned() else {
            warn!(
                "event=roster_delete module=service status=rejected index={} count={}",
                index, len
            );
            return Err(RosterError::NoSelection { index, len });
        };

        self.enter(WorkflowPhase::Persisting, "delete");
        let mut next = self.store.snapshot();
        next.remove(index);
        match self.repo.save(&next) {
            Ok(()) => {
                self.store.remove_at(index);
                self.enter(WorkflowPhase::Idle, "delete");
                info!(
                    "event=roster_delete module=service status=ok census_id={} count={}",
                    victim.census_id,
                    self.store.len()
                );
                Ok(victim)
            }
            Err(err) => {
                self.enter(WorkflowPhase::Idle, "delete");
                Err(err.into())
            }
        }
    }

    /// Current records in insertion order.
    pub fn list(&self) -> &[Student] {
        self.store.list()
    }

    /// Fresh owned projection for the presentation layer.
    pub fn snapshot(&self) -> Vec<Student> {
        self.store.snapshot()
    }

    pub fn get(&self, index: usize) -> Option<&Student> {
        self.store.get(index)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    fn enter(&mut self, phase: WorkflowPhase, op: &str) {
        self.phase = phase;
        debug!(
            "event=workflow module=service op={} phase={}",
            op,
            phase.label()
        );
    }
}
