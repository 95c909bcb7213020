//! Core employee record types for rosterkeeper.
//!
//! This module defines the fundamental data structures for representing
//! employee records as they move from form input to persistent storage.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::photo;

/// The sex recorded for an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Recorded as male.
    Male,
    /// Recorded as female.
    Female,
    /// Other, or the employee preferred not to say.
    Unspecified,
}

impl Sex {
    /// The label shown on the display surface.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unspecified => "Other / Preferred not to say",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unspecified" => Ok(Self::Unspecified),
            other => Err(format!("unknown sex value: {other}")),
        }
    }
}

/// A persisted (or about-to-be-persisted) employee record.
///
/// A record is only ever constructed from a [`Candidate`] that passed
/// validation, so every `Employee` satisfies the business rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier, assigned by the store. Immutable once assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Contact email address.
    pub email: String,

    /// Recorded sex.
    pub sex: Sex,

    /// Date of birth.
    pub birthdate: NaiveDate,

    /// Profile photo as a `data:` URI, or the empty placeholder.
    pub profile_photo: String,
}

impl Employee {
    /// The display name, `"first last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this record carries an uploaded photo.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        !photo::is_placeholder(&self.profile_photo)
    }

    /// Whole-year age as of now.
    #[must_use]
    pub fn age(&self) -> i32 {
        age_from_birthdate(self.birthdate, Utc::now())
    }
}

/// A candidate employee record built from raw form input.
///
/// Fields that must be *selected* (sex, birthdate) stay optional here so
/// the validator can report them as unselected instead of the form layer
/// rejecting the whole submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Given name as entered.
    pub first_name: String,
    /// Family name as entered.
    pub last_name: String,
    /// Email address as entered.
    pub email: String,
    /// Selected sex, if any.
    pub sex: Option<Sex>,
    /// Selected birthdate, if it parsed to a valid calendar date.
    pub birthdate: Option<NaiveDate>,
    /// Encoded photo, or the empty placeholder.
    pub profile_photo: String,
}

impl Candidate {
    /// Convert a validated candidate into a storable record.
    ///
    /// # Errors
    ///
    /// Returns an internal error if called on a candidate whose sex or
    /// birthdate is still unselected; the validator rejects those first.
    pub fn into_employee(self) -> crate::error::Result<Employee> {
        let (Some(sex), Some(birthdate)) = (self.sex, self.birthdate) else {
            return Err(crate::error::Error::internal(
                "candidate converted before validation",
            ));
        };
        Ok(Employee {
            id: None,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            sex,
            birthdate,
            profile_photo: self.profile_photo,
        })
    }
}

/// Whole-year age at `now` for the given birthdate.
///
/// Computed the epoch-normalized way: the elapsed duration since the
/// birthdate is added to the Unix epoch and the resulting calendar year
/// minus 1970 is the age. A birthdate exactly N years before `now` yields
/// N; one day short of N years yields N - 1.
#[must_use]
pub fn age_from_birthdate(birthdate: NaiveDate, now: DateTime<Utc>) -> i32 {
    let birth = birthdate.and_time(NaiveTime::MIN).and_utc();
    let shifted = DateTime::<Utc>::UNIX_EPOCH + (now - birth);
    (shifted.year() - 1970).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Employee {
        Employee {
            id: None,
            first_name: "Anna".to_string(),
            last_name: "Lee".to_string(),
            email: "anna.lee@example.com".to_string(),
            sex: Sex::Female,
            birthdate: date(1990, 1, 5),
            profile_photo: String::new(),
        }
    }

    #[test]
    fn test_sex_display() {
        assert_eq!(Sex::Male.to_string(), "male");
        assert_eq!(Sex::Female.to_string(), "female");
        assert_eq!(Sex::Unspecified.to_string(), "unspecified");
    }

    #[test]
    fn test_sex_label() {
        assert_eq!(Sex::Male.label(), "Male");
        assert_eq!(Sex::Female.label(), "Female");
        assert_eq!(Sex::Unspecified.label(), "Other / Preferred not to say");
    }

    #[test]
    fn test_sex_from_str() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("unspecified".parse::<Sex>().unwrap(), Sex::Unspecified);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample().full_name(), "Anna Lee");
    }

    #[test]
    fn test_has_photo() {
        let mut employee = sample();
        assert!(!employee.has_photo());

        employee.profile_photo = "data:image/png;base64,AAAA".to_string();
        assert!(employee.has_photo());
    }

    #[test]
    fn test_age_exact_birthday() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        assert_eq!(age_from_birthdate(date(2010, 8, 24), now), 16);
    }

    #[test]
    fn test_age_one_day_short() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        assert_eq!(age_from_birthdate(date(2010, 8, 25), now), 15);
    }

    #[test]
    fn test_age_day_after_birthday() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        assert_eq!(age_from_birthdate(date(2010, 8, 23), now), 16);
    }

    #[test]
    fn test_candidate_into_employee() {
        let candidate = Candidate {
            first_name: "Anna".to_string(),
            last_name: "Lee".to_string(),
            email: "anna@example.com".to_string(),
            sex: Some(Sex::Female),
            birthdate: Some(date(1990, 1, 5)),
            profile_photo: String::new(),
        };

        let employee = candidate.into_employee().unwrap();
        assert!(employee.id.is_none());
        assert_eq!(employee.first_name, "Anna");
        assert_eq!(employee.sex, Sex::Female);
    }

    #[test]
    fn test_candidate_into_employee_unselected() {
        let candidate = Candidate {
            first_name: "Anna".to_string(),
            ..Candidate::default()
        };
        assert!(candidate.into_employee().is_err());
    }

    #[test]
    fn test_employee_serialization_skips_missing_id() {
        let employee = sample();
        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("\"id\""));

        let mut with_id = sample();
        with_id.id = Some("abc".to_string());
        let json = serde_json::to_string(&with_id).unwrap();
        assert!(json.contains("\"id\":\"abc\""));
    }

    #[test]
    fn test_employee_round_trip() {
        let employee = sample();
        let json = serde_json::to_string(&employee).unwrap();
        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, back);
    }

    #[test]
    fn test_sex_wire_names() {
        let json = serde_json::to_string(&Sex::Unspecified).unwrap();
        assert_eq!(json, "\"unspecified\"");
    }
}
