//! Form-input validation for the add workflow.
//!
//! # Responsibility
//! - Check required fields, phone format, and census-id parseability.
//! - Build a `Student` from raw form text once every check passes.
//!
//! # Invariants
//! - Checks run in a fixed order: required fields, phone, census id.
//! - Accepted values flow into the record exactly as submitted; only
//!   the census id is trimmed before parsing.
//! - Failures are reported as error values, never panics.

use crate::model::student::Student;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Optional 3-digit area code (parenthesized or separator-joined),
/// then 3 digits, separator, 4 digits.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\(\d{3}\)\s?|\d{3}[-.\s]?)?\d{3}[-.\s]?\d{4}$").expect("valid phone regex")
});

/// Raw form input for the add workflow, all fields as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub census_id: String,
    pub cell_phone_number: String,
    pub degree_pursued: String,
}

/// Input error reported to the user; the operation aborts with no
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty or whitespace-only.
    EmptyField(&'static str),
    /// Phone text does not match the accepted digit grouping.
    InvalidPhone(String),
    /// Census id text is not a base-10 integer.
    InvalidCensusId(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "required field `{field}` is empty"),
            Self::InvalidPhone(value) => write!(f, "invalid phone number format: `{value}`"),
            Self::InvalidCensusId(value) => {
                write!(f, "census id must be a base-10 integer, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects requests with any empty or whitespace-only field.
pub fn validate_required(request: &AddStudentRequest) -> Result<(), ValidationError> {
    let fields: [(&'static str, &str); 5] = [
        ("first name", &request.first_name),
        ("last name", &request.last_name),
        ("census id", &request.census_id),
        ("cell phone number", &request.cell_phone_number),
        ("degree pursued", &request.degree_pursued),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField(name));
        }
    }
    Ok(())
}

/// Whether `text` matches the accepted phone digit grouping.
pub fn validate_phone(text: &str) -> bool {
    PHONE_RE.is_match(text)
}

/// Parses the census id as a base-10 integer. Surrounding whitespace is
/// tolerated.
pub fn parse_census_id(text: &str) -> Result<i64, ValidationError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidCensusId(text.to_string()))
}

/// Runs all checks in order and builds the record on success.
pub fn validate(request: &AddStudentRequest) -> Result<Student, ValidationError> {
    validate_required(request)?;
    if !validate_phone(&request.cell_phone_number) {
        return Err(ValidationError::InvalidPhone(request.cell_phone_number.clone()));
    }
    let census_id = parse_census_id(&request.census_id)?;
    Ok(Student::new(
        request.first_name.clone(),
        request.last_name.clone(),
        census_id,
        request.cell_phone_number.clone(),
        request.degree_pursued.clone(),
    ))
}
