//! Repository contract and JSON-file implementation.
//!
//! # Responsibility
//! - Serialize the full record list to indented JSON and atomically
//!   replace the target file.
//! - Deserialize the file back, tolerating missing files and setting
//!   malformed files aside instead of discarding them.
//!
//! # Invariants
//! - `save` goes through a same-directory tempfile plus rename, so the
//!   previous file survives a failed write.
//! - A malformed file is renamed to `<name>.corrupt-<millis>` before
//!   the empty fallback is returned, and the fallback is reported.

use crate::model::student::Student;
use log::{error, info, warn};
use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;

/// Default roster file, colocated with the process working directory.
pub const DEFAULT_FILE_NAME: &str = "students.json";

pub type PersistResult<T> = Result<T, PersistError>;

/// Persistence failure surfaced to the user; the current operation
/// aborts, the process never does.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Replace(tempfile::PersistError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "roster file I/O failed: {err}"),
            Self::Json(err) => write!(f, "roster serialization failed: {err}"),
            Self::Replace(err) => write!(f, "roster file replace failed: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Replace(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<tempfile::PersistError> for PersistError {
    fn from(value: tempfile::PersistError) -> Self {
        Self::Replace(value)
    }
}

/// What a load fell back from, for user-facing reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFallback {
    /// Human-readable cause of the fallback.
    pub reason: String,
    /// Where the unreadable file was moved, when the rename succeeded.
    pub set_aside: Option<PathBuf>,
}

/// Load result: the records plus an optional fallback report.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<Student>,
    pub fallback: Option<LoadFallback>,
}

/// Repository contract for roster persistence.
pub trait StudentRepository {
    fn load(&self) -> PersistResult<LoadReport>;
    fn save(&self, records: &[Student]) -> PersistResult<()>;
}

/// JSON-file-backed roster repository.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `students.json` relative to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn replace_file(&self, data: &[u8]) -> PersistResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Moves the unreadable file to `<name>.corrupt-<millis>` so it can
    /// be inspected later. Returns the new location, or `None` when the
    /// rename itself failed (the fallback still proceeds).
    fn set_aside_corrupt(&self) -> Option<PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or(0);
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_FILE_NAME));
        name.push(format!(".corrupt-{millis}"));
        let target = self.path.with_file_name(name);

        match std::fs::rename(&self.path, &target) {
            Ok(()) => Some(target),
            Err(err) => {
                warn!(
                    "event=roster_set_aside module=persist status=error path={} error={}",
                    self.path.display(),
                    err
                );
                None
            }
        }
    }
}

impl StudentRepository for JsonFileRepository {
    fn load(&self) -> PersistResult<LoadReport> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "event=roster_load module=persist status=ok path={} count=0 source=missing_file",
                    self.path.display()
                );
                return Ok(LoadReport::default());
            }
            Err(err) => {
                error!(
                    "event=roster_load module=persist status=error path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(err.into());
            }
        };

        match serde_json::from_str::<Vec<Student>>(&text) {
            Ok(records) => {
                info!(
                    "event=roster_load module=persist status=ok path={} count={}",
                    self.path.display(),
                    records.len()
                );
                Ok(LoadReport {
                    records,
                    fallback: None,
                })
            }
            Err(err) => {
                let set_aside = self.set_aside_corrupt();
                error!(
                    "event=roster_load module=persist status=error path={} error_code=malformed_roster error={}",
                    self.path.display(),
                    err
                );
                Ok(LoadReport {
                    records: Vec::new(),
                    fallback: Some(LoadFallback {
                        reason: format!("malformed roster file: {err}"),
                        set_aside,
                    }),
                })
            }
        }
    }

    fn save(&self, records: &[Student]) -> PersistResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        match self.replace_file(&json) {
            Ok(()) => {
                info!(
                    "event=roster_save module=persist status=ok path={} count={}",
                    self.path.display(),
                    records.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=roster_save module=persist status=error path={} error={}",
                    self.path.display(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFileRepository, StudentRepository, DEFAULT_FILE_NAME};
    use crate::model::student::Student;
    use tempfile::TempDir;

    #[test]
    fn default_path_is_the_working_directory_file() {
        assert_eq!(
            JsonFileRepository::default_path().to_str(),
            Some(DEFAULT_FILE_NAME)
        );
    }

    #[test]
    fn save_writes_indented_json() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join(DEFAULT_FILE_NAME));

        repo.save(&[Student::new("Ann", "Lee", 1001, "555-123-4567", "CS")])
            .unwrap();

        let text = std::fs::read_to_string(repo.path()).unwrap();
        assert!(text.contains("\n  "), "expected indented output: {text}");
        assert!(text.contains("\"FirstName\": \"Ann\""));
    }

    #[test]
    fn save_replaces_previous_content_in_full() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join(DEFAULT_FILE_NAME));

        repo.save(&[
            Student::new("Ann", "Lee", 1001, "555-123-4567", "CS"),
            Student::new("Bea", "Orr", 1002, "5551234567", "Math"),
        ])
        .unwrap();
        repo.save(&[Student::new("Cal", "Ude", 1003, "(555) 123-4567", "Bio")])
            .unwrap();

        let report = repo.load().unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].first_name, "Cal");
    }
}
