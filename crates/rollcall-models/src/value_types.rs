//! Domain primitives shared by teachers and students, with the custom
//! validators the DTOs plug into `validator`.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidationError;

/// Earliest academic year a class may be created for.
pub const MIN_CLASS_YEAR: i32 = 2000;

/// Number of digits in a contact number.
pub const CONTACT_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGender(pub String);

impl fmt::Display for InvalidGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid gender `{}`", self.0)
    }
}

impl std::error::Error for InvalidGender {}

impl FromStr for Gender {
    type Err = InvalidGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| InvalidGender(s.to_string()))
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Latest academic year a class may be created for.
pub fn max_class_year() -> i32 {
    Utc::now().year() + 1
}

pub fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    gender
        .parse::<Gender>()
        .map(|_| ())
        .map_err(|_| error("gender", "Gender must be one of Male, Female, Other"))
}

/// Exactly ten ASCII digits.
pub fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    if contact.len() == CONTACT_DIGITS && contact.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(error("contact", "Contact must be exactly 10 digits"))
    }
}

pub fn validate_class_year(year: i32) -> Result<(), ValidationError> {
    if (MIN_CLASS_YEAR..=max_class_year()).contains(&year) {
        Ok(())
    } else {
        Err(error("year", "Year must be between 2000 and next year"))
    }
}

/// Canonical stored form of an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_is_case_sensitive() {
        assert_eq!("Male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("Other".parse::<Gender>(), Ok(Gender::Other));
        assert!("male".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_serializes_as_variant_name() {
        let json = serde_json::to_string(&Gender::Female).unwrap();
        assert_eq!(json, r#""Female""#);
    }

    #[test]
    fn test_contact() {
        assert!(validate_contact("0123456789").is_ok());
        assert!(validate_contact("012345678").is_err());
        assert!(validate_contact("01234567890").is_err());
        assert!(validate_contact("01234-6789").is_err());
        assert!(validate_contact("０１２３４５６７８９").is_err());
    }

    #[test]
    fn test_class_year_window() {
        assert!(validate_class_year(2000).is_ok());
        assert!(validate_class_year(max_class_year()).is_ok());
        assert!(validate_class_year(1999).is_err());
        assert!(validate_class_year(max_class_year() + 1).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@School.TEST "), "jane.doe@school.test");
    }
}
