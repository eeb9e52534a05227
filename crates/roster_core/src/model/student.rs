//! Student domain model.
//!
//! # Responsibility
//! - Define the roster record persisted to the JSON file.
//! - Serialize with PascalCase wire names (`FirstName`, `LastName`,
//!   `CensusId`, `CellPhoneNumber`, `DegreePursued`).
//! - Deserialize with case-insensitive field-name matching.
//!
//! # Invariants
//! - Field values are stored exactly as submitted; validation happens
//!   before a `Student` is constructed, never here.
//! - `census_id` is not enforced unique; duplicate ids are legal.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};

/// One roster record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub census_id: i64,
    pub cell_phone_number: String,
    pub degree_pursued: String,
}

impl Student {
    /// Creates a record from already-validated field values.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        census_id: i64,
        cell_phone_number: impl Into<String>,
        degree_pursued: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            census_id,
            cell_phone_number: cell_phone_number.into(),
            degree_pursued: degree_pursued.into(),
        }
    }

    /// `"First Last"` form used by confirmation dialogs and log lines.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Wire fields recognized on deserialize. Matching is case-insensitive
/// to accept files written by earlier tooling with different casing.
#[derive(Clone, Copy)]
enum WireField {
    FirstName,
    LastName,
    CensusId,
    CellPhoneNumber,
    DegreePursued,
}

const WIRE_FIELDS: [(&str, WireField); 5] = [
    ("FirstName", WireField::FirstName),
    ("LastName", WireField::LastName),
    ("CensusId", WireField::CensusId),
    ("CellPhoneNumber", WireField::CellPhoneNumber),
    ("DegreePursued", WireField::DegreePursued),
];

fn wire_field(key: &str) -> Option<WireField> {
    WIRE_FIELDS
        .iter()
        .find(|(name, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, field)| *field)
}

impl<'de> Deserialize<'de> for Student {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StudentVisitor;

        impl<'de> Visitor<'de> for StudentVisitor {
            type Value = Student;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("a student record object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Student, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut first_name: Option<String> = None;
                let mut last_name: Option<String> = None;
                let mut census_id: Option<i64> = None;
                let mut cell_phone_number: Option<String> = None;
                let mut degree_pursued: Option<String> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match wire_field(&key) {
                        Some(WireField::FirstName) => {
                            if first_name.is_some() {
                                return Err(de::Error::duplicate_field("FirstName"));
                            }
                            first_name = Some(map.next_value()?);
                        }
                        Some(WireField::LastName) => {
                            if last_name.is_some() {
                                return Err(de::Error::duplicate_field("LastName"));
                            }
                            last_name = Some(map.next_value()?);
                        }
                        Some(WireField::CensusId) => {
                            if census_id.is_some() {
                                return Err(de::Error::duplicate_field("CensusId"));
                            }
                            census_id = Some(map.next_value()?);
                        }
                        Some(WireField::CellPhoneNumber) => {
                            if cell_phone_number.is_some() {
                                return Err(de::Error::duplicate_field("CellPhoneNumber"));
                            }
                            cell_phone_number = Some(map.next_value()?);
                        }
                        Some(WireField::DegreePursued) => {
                            if degree_pursued.is_some() {
                                return Err(de::Error::duplicate_field("DegreePursued"));
                            }
                            degree_pursued = Some(map.next_value()?);
                        }
                        // Unknown keys are skipped, not rejected.
                        None => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                Ok(Student {
                    first_name: first_name.ok_or_else(|| de::Error::missing_field("FirstName"))?,
                    last_name: last_name.ok_or_else(|| de::Error::missing_field("LastName"))?,
                    census_id: census_id.ok_or_else(|| de::Error::missing_field("CensusId"))?,
                    cell_phone_number: cell_phone_number
                        .ok_or_else(|| de::Error::missing_field("CellPhoneNumber"))?,
                    degree_pursued: degree_pursued
                        .ok_or_else(|| de::Error::missing_field("DegreePursued"))?,
                })
            }
        }

        deserializer.deserialize_map(StudentVisitor)
    }
}
