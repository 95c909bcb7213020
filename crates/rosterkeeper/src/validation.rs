//! Business-rule validation for candidate employee records.
//!
//! The validator checks every rule independently and collects all
//! violations into a report, in fixed field order: first name, last name,
//! email, sex, birthdate, photo. It never short-circuits and never returns
//! `Err`; an invalid record is simply one whose report carries errors.

use chrono::Utc;
use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::config::ValidationConfig;
use crate::employee::{age_from_birthdate, Candidate};
use crate::photo;

/// Minimum whole-year age for an employee.
pub const MIN_AGE: i32 = 16;

/// Email pattern: a dotted local part or quoted string, then "@", then a
/// dotted hostname with a >=2 letter top-level label or a bracketed IPv4
/// literal.
const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}))$"#;

/// One violated business rule, with its user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// First name is missing.
    #[error("First name must not be empty!")]
    FirstNameEmpty,

    /// Last name is missing.
    #[error("Last name must not be empty!")]
    LastNameEmpty,

    /// Email is missing.
    #[error("Email must not be empty!")]
    EmailEmpty,

    /// Email does not match the canonical address pattern.
    #[error("Email must be in the correct format!")]
    EmailFormat,

    /// No sex was selected.
    #[error("Sex must be selected!")]
    SexUnselected,

    /// No valid birthdate was selected.
    #[error("Birthdate must be selected!")]
    BirthdateUnselected,

    /// The computed age is below [`MIN_AGE`].
    #[error("The employee must be 16 or older!")]
    Underage,

    /// No profile photo was provided (only when photos are required).
    #[error("A profile photo must be provided!")]
    PhotoMissing,
}

/// The outcome of validating a candidate record.
///
/// Validity is strictly "no errors"; there is no partial-success state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Violations in fixed field order.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Whether the candidate passed every rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The user-facing messages, in report order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validator for candidate employee records.
#[derive(Debug)]
pub struct Validator {
    email_regex: Regex,
    require_photo: bool,
}

impl Validator {
    /// Create a validator with the default rules (photo optional).
    ///
    /// # Panics
    ///
    /// Panics if the built-in email pattern fails to compile, which would
    /// be a bug.
    #[must_use]
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(EMAIL_PATTERN).expect("invalid email pattern"),
            require_photo: false,
        }
    }

    /// Create a validator honoring the given configuration.
    #[must_use]
    pub fn with_config(config: &ValidationConfig) -> Self {
        let mut validator = Self::new();
        validator.require_photo = config.require_photo;
        validator
    }

    /// Validate a candidate record, collecting every violation.
    #[must_use]
    pub fn validate(&self, candidate: &Candidate) -> ValidationReport {
        let mut report = ValidationReport::default();

        if candidate.first_name.is_empty() {
            report.errors.push(ValidationError::FirstNameEmpty);
        }

        if candidate.last_name.is_empty() {
            report.errors.push(ValidationError::LastNameEmpty);
        }

        if candidate.email.is_empty() {
            report.errors.push(ValidationError::EmailEmpty);
        } else if !self.email_regex.is_match(&candidate.email) {
            report.errors.push(ValidationError::EmailFormat);
        }

        if candidate.sex.is_none() {
            report.errors.push(ValidationError::SexUnselected);
        }

        match candidate.birthdate {
            None => report.errors.push(ValidationError::BirthdateUnselected),
            Some(birthdate) => {
                if age_from_birthdate(birthdate, Utc::now()) < MIN_AGE {
                    report.errors.push(ValidationError::Underage);
                }
            }
        }

        if self.require_photo && photo::is_placeholder(&candidate.profile_photo) {
            report.errors.push(ValidationError::PhotoMissing);
        }

        trace!(errors = report.errors.len(), "Validated candidate");
        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Sex;
    use chrono::{Datelike, NaiveDate, Utc};

    fn valid_candidate() -> Candidate {
        Candidate {
            first_name: "Anna".to_string(),
            last_name: "Lee".to_string(),
            email: "anna.lee@example.com".to_string(),
            sex: Some(Sex::Female),
            birthdate: NaiveDate::from_ymd_opt(1990, 1, 5),
            profile_photo: String::new(),
        }
    }

    #[test]
    fn test_valid_candidate_passes() {
        let report = Validator::new().validate(&valid_candidate());
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_first_name() {
        let mut candidate = valid_candidate();
        candidate.first_name = String::new();

        let report = Validator::new().validate(&candidate);
        assert!(!report.is_valid());
        assert_eq!(report.errors, vec![ValidationError::FirstNameEmpty]);
    }

    #[test]
    fn test_empty_last_name() {
        let mut candidate = valid_candidate();
        candidate.last_name = String::new();

        let report = Validator::new().validate(&candidate);
        assert_eq!(report.errors, vec![ValidationError::LastNameEmpty]);
    }

    #[test]
    fn test_empty_email() {
        let mut candidate = valid_candidate();
        candidate.email = String::new();

        let report = Validator::new().validate(&candidate);
        assert_eq!(report.errors, vec![ValidationError::EmailEmpty]);
    }

    #[test]
    fn test_email_format() {
        let validator = Validator::new();

        for bad in ["plainaddress", "a@b", "a@b.", "@example.com", "a b@c.de"] {
            let mut candidate = valid_candidate();
            candidate.email = bad.to_string();
            let report = validator.validate(&candidate);
            assert_eq!(
                report.errors,
                vec![ValidationError::EmailFormat],
                "expected {bad} to fail the format check"
            );
        }

        for good in [
            "a@b.co",
            "first.last@sub.example.com",
            "user@[192.168.0.1]",
            "\"quoted local\"@example.com",
        ] {
            let mut candidate = valid_candidate();
            candidate.email = good.to_string();
            assert!(
                validator.validate(&candidate).is_valid(),
                "expected {good} to pass"
            );
        }
    }

    #[test]
    fn test_sex_unselected() {
        let mut candidate = valid_candidate();
        candidate.sex = None;

        let report = Validator::new().validate(&candidate);
        assert_eq!(report.errors, vec![ValidationError::SexUnselected]);
    }

    #[test]
    fn test_birthdate_unselected() {
        let mut candidate = valid_candidate();
        candidate.birthdate = None;

        let report = Validator::new().validate(&candidate);
        assert_eq!(report.errors, vec![ValidationError::BirthdateUnselected]);
    }

    #[test]
    fn test_underage_boundary() {
        let validator = Validator::new();
        // Keep "today" off Feb 29 so the year shift below is a real date.
        let mut today = Utc::now().date_naive();
        if today.month() == 2 && today.day() == 29 {
            today = today.pred_opt().unwrap();
        }
        let exact = today.with_year(today.year() - MIN_AGE).unwrap();

        let mut candidate = valid_candidate();
        candidate.birthdate = Some(exact);
        assert!(validator.validate(&candidate).is_valid());

        // Two days past the cutoff is unambiguously underage; the exact
        // one-day boundary is pinned down in employee::tests with a fixed
        // clock.
        candidate.birthdate = Some(exact + chrono::Days::new(2));
        let report = validator.validate(&candidate);
        assert_eq!(report.errors, vec![ValidationError::Underage]);
    }

    #[test]
    fn test_errors_accumulate_in_field_order() {
        let candidate = Candidate {
            email: "not-an-email".to_string(),
            ..Candidate::default()
        };

        let report = Validator::new().validate(&candidate);
        assert_eq!(
            report.errors,
            vec![
                ValidationError::FirstNameEmpty,
                ValidationError::LastNameEmpty,
                ValidationError::EmailFormat,
                ValidationError::SexUnselected,
                ValidationError::BirthdateUnselected,
            ]
        );
    }

    #[test]
    fn test_valid_field_does_not_suppress_others() {
        let mut candidate = valid_candidate();
        candidate.first_name = String::new();
        candidate.sex = None;

        let report = Validator::new().validate(&candidate);
        assert_eq!(
            report.errors,
            vec![
                ValidationError::FirstNameEmpty,
                ValidationError::SexUnselected,
            ]
        );
    }

    #[test]
    fn test_photo_optional_by_default() {
        let report = Validator::new().validate(&valid_candidate());
        assert!(report.is_valid());
    }

    #[test]
    fn test_photo_required() {
        let config = ValidationConfig { require_photo: true };
        let validator = Validator::with_config(&config);

        let report = validator.validate(&valid_candidate());
        assert_eq!(report.errors, vec![ValidationError::PhotoMissing]);

        let mut candidate = valid_candidate();
        candidate.profile_photo = "data:image/png;base64,AAAA".to_string();
        assert!(validator.validate(&candidate).is_valid());
    }

    #[test]
    fn test_messages() {
        let mut candidate = valid_candidate();
        candidate.first_name = String::new();

        let report = Validator::new().validate(&candidate);
        assert_eq!(report.messages(), vec!["First name must not be empty!"]);
    }
}
