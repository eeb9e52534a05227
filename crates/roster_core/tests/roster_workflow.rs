use roster_core::{
    AddStudentRequest, JsonFileRepository, LoadReport, PersistResult, RosterError, RosterService,
    Student, StudentRepository, WorkflowPhase,
};
use tempfile::TempDir;

fn ann_lee() -> AddStudentRequest {
    AddStudentRequest {
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        census_id: "1001".to_string(),
        cell_phone_number: "555-123-4567".to_string(),
        degree_pursued: "CS".to_string(),
    }
}

fn open_in(dir: &TempDir) -> RosterService<JsonFileRepository> {
    let repo = JsonFileRepository::new(dir.path().join("students.json"));
    let (service, fallback) = RosterService::open(repo);
    assert!(fallback.is_none(), "unexpected fallback: {fallback:?}");
    service
}

/// Repository whose saves always fail, for write-then-commit checks.
struct BrokenSaveRepository;

impl StudentRepository for BrokenSaveRepository {
    fn load(&self) -> PersistResult<LoadReport> {
        Ok(LoadReport::default())
    }

    fn save(&self, _records: &[Student]) -> PersistResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk says no").into())
    }
}

#[test]
fn valid_add_grows_the_roster_by_one_with_submitted_values() {
    let dir = TempDir::new().unwrap();
    let mut service = open_in(&dir);

    let added = service.add(&ann_lee()).unwrap();
    assert_eq!(service.len(), 1);
    assert_eq!(added, Student::new("Ann", "Lee", 1001, "555-123-4567", "CS"));
    assert_eq!(service.list(), [added]);
    assert_eq!(service.phase(), WorkflowPhase::Idle);
}

#[test]
fn invalid_inputs_leave_the_roster_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut service = open_in(&dir);

    let mut blank_last = ann_lee();
    blank_last.last_name = "  ".to_string();
    let mut bad_phone = ann_lee();
    bad_phone.cell_phone_number = "12-34".to_string();
    let mut bad_census = ann_lee();
    bad_census.census_id = "a1001".to_string();

    for request in [blank_last, bad_phone, bad_census] {
        let err = service.add(&request).unwrap_err();
        assert!(matches!(err, RosterError::Input(_)), "unexpected error: {err}");
        assert_eq!(service.len(), 0);
        assert_eq!(service.phase(), WorkflowPhase::Idle);
    }

    // Nothing was persisted either.
    assert!(!dir.path().join("students.json").exists());
}

#[test]
fn delete_with_invalid_selection_reports_and_mutates_nothing() {
    let dir = TempDir::new().unwrap();
    let mut service = open_in(&dir);
    service.add(&ann_lee()).unwrap();

    let err = service.delete_at(5).unwrap_err();
    assert!(matches!(err, RosterError::NoSelection { index: 5, len: 1 }));
    assert_eq!(service.len(), 1);
    assert_eq!(service.phase(), WorkflowPhase::Idle);
}

#[test]
fn delete_removes_the_selected_record_and_persists() {
    let dir = TempDir::new().unwrap();
    let mut service = open_in(&dir);
    service.add(&ann_lee()).unwrap();
    let mut second = ann_lee();
    second.first_name = "Bea".to_string();
    second.census_id = "1002".to_string();
    service.add(&second).unwrap();

    let removed = service.delete_at(0).unwrap();
    assert_eq!(removed.first_name, "Ann");
    assert_eq!(service.len(), 1);
    assert_eq!(service.list()[0].first_name, "Bea");

    // The shrunken list is what a fresh session sees.
    let reopened = open_in(&dir);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.list()[0].first_name, "Bea");
}

#[test]
fn failed_save_leaves_memory_unchanged() {
    let (mut service, fallback) = RosterService::open(BrokenSaveRepository);
    assert!(fallback.is_none());

    let add_err = service.add(&ann_lee()).unwrap_err();
    assert!(matches!(add_err, RosterError::Persist(_)));
    assert_eq!(service.len(), 0);
    assert_eq!(service.phase(), WorkflowPhase::Idle);
}

#[test]
fn open_with_corrupt_file_reports_fallback_and_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("students.json");
    std::fs::write(&path, "][").unwrap();

    let (service, fallback) = RosterService::open(JsonFileRepository::new(&path));
    assert!(service.is_empty());
    let fallback = fallback.expect("corrupt file should be reported");
    assert!(fallback.set_aside.is_some());
}

#[test]
fn added_record_survives_a_fresh_session() {
    let dir = TempDir::new().unwrap();

    let mut service = open_in(&dir);
    service.add(&ann_lee()).unwrap();
    drop(service);

    let reopened = open_in(&dir);
    assert_eq!(
        reopened.list(),
        [Student::new("Ann", "Lee", 1001, "555-123-4567", "CS")]
    );
}
