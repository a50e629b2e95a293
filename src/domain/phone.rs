use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidationError;

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("phone number must start with '+' followed by the country code")]
    MissingCountryCode,
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("phone number must have between 8 and 15 digits")]
    InvalidLength,
    #[error("country code cannot start with 0")]
    InvalidCountryCode,
}

/// A phone number in E.164 form: `+` followed by 8 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize user input into E.164.
    ///
    /// Spaces, dashes, dots and parentheses are stripped. An international `00`
    /// prefix is accepted in place of `+`. National formats without a country code
    /// are rejected since there is no default region to resolve them against.
    pub fn parse(input: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = input.trim();
        let rest = if let Some(rest) = trimmed.strip_prefix('+') {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("00") {
            rest
        } else {
            return Err(PhoneNumberError::MissingCountryCode);
        };

        let mut digits = String::with_capacity(MAX_DIGITS);
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneNumberError::InvalidCharacter(other)),
            }
        }

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneNumberError::InvalidLength);
        }
        if digits.starts_with('0') {
            return Err(PhoneNumberError::InvalidCountryCode);
        }

        Ok(Self(format!("+{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// `validator` hook for request bodies carrying a raw phone number.
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    PhoneNumber::parse(value).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("phone_number");
        error.message = Some(e.to_string().into());
        error
    })
}
