use serde::{Deserialize, Serialize};

const MIN_NAME_CHARS: usize = 2;
const MIN_AGE: u8 = 12;
const MAX_AGE: u8 = 100;
const PHONE_CHARS: std::ops::RangeInclusive<usize> = 10..=15;

/// Registration rejections, one per form field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("name must be at least 2 characters")]
    NameTooShort,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("phone number must be 10-15 digits, '+', '-' or spaces")]
    InvalidPhone,
    #[error("age must be between 12 and 100 (got {0})")]
    AgeOutOfRange(u8),
    #[error("gender is required")]
    MissingGender,
    #[error("occupation is required")]
    MissingOccupation,
    #[error("consent to the assessment terms is required")]
    ConsentRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Gender::Male => "Laki-laki",
            Gender::Female => "Perempuan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Student,
    Employee,
    Government,
    Entrepreneur,
    Professional,
    Healthcare,
    Teacher,
    Housewife,
    Retired,
    Other,
}

impl Occupation {
    pub const fn label(self) -> &'static str {
        match self {
            Occupation::Student => "student",
            Occupation::Employee => "employee",
            Occupation::Government => "government",
            Occupation::Entrepreneur => "entrepreneur",
            Occupation::Professional => "professional",
            Occupation::Healthcare => "healthcare",
            Occupation::Teacher => "teacher",
            Occupation::Housewife => "housewife",
            Occupation::Retired => "retired",
            Occupation::Other => "other",
        }
    }
}

/// Personal details captured before the questionnaire starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub age: u8,
    pub gender: Option<Gender>,
    pub occupation: Option<Occupation>,
    #[serde(default)]
    pub consent: bool,
}

impl RespondentProfile {
    /// Check every field, reporting the first failure in form order.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.name.trim().chars().count() < MIN_NAME_CHARS {
            return Err(RegistrationError::NameTooShort);
        }
        if !is_plausible_email(&self.email) {
            return Err(RegistrationError::InvalidEmail);
        }
        if !self.phone.is_empty() && !is_plausible_phone(&self.phone) {
            return Err(RegistrationError::InvalidPhone);
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(RegistrationError::AgeOutOfRange(self.age));
        }
        if self.gender.is_none() {
            return Err(RegistrationError::MissingGender);
        }
        if self.occupation.is_none() {
            return Err(RegistrationError::MissingOccupation);
        }
        if !self.consent {
            return Err(RegistrationError::ConsentRequired);
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace and a dot after the `@`.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_plausible_phone(phone: &str) -> bool {
    PHONE_CHARS.contains(&phone.chars().count())
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '))
}
