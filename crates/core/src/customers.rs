//! Customers and account forms

use std::{fmt, sync::LazyLock};

use jiff::civil::Date;
use regex::Regex;
use thiserror::Error;
use zeroize::Zeroize;

/// Shortest password accepted at registration, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Shortest delivery phone number accepted at checkout, in characters.
pub const MIN_PHONE_LEN: usize = 10;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Form validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("please fill in all required fields")]
    MissingFields,

    /// The email address is malformed.
    #[error("please enter a valid email address")]
    InvalidEmail,

    /// The phone number is too short.
    #[error("please enter a valid phone number")]
    InvalidPhone,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password is too short.
    #[error("password must be at least 8 characters long")]
    PasswordTooShort,

    /// Terms of service were not accepted.
    #[error("please agree to the terms of service")]
    TermsNotAccepted,
}

/// Returns true when `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Trim and lower-case an email so records from different sources compare equal.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Password held only as long as a form needs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap a password.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Borrow the password for sending to the backend.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true when the password is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Registered customer as listed on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Full name
    pub name: String,

    /// Email, trimmed and lower-cased
    pub email: String,

    /// Date the account was created
    pub registration_date: Option<Date>,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Full name
    pub name: String,

    /// Email, trimmed and lower-cased
    pub email: String,
}

impl User {
    /// Backup record for the registered users list.
    pub fn registered_on(&self, date: Date) -> Customer {
        Customer {
            name: self.name.clone(),
            email: self.email.clone(),
            registration_date: Some(date),
        }
    }
}

/// Sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email
    pub email: String,

    /// Password
    pub password: Password,

    /// Password confirmation
    pub confirm_password: Password,

    /// Whether the terms of service were accepted
    pub agree_terms: bool,

    /// Whether to subscribe to the newsletter after signing up
    pub subscribe_newsletter: bool,
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Full name
    pub name: String,

    /// Email, trimmed and lower-cased
    pub email: String,

    /// Password
    pub password: Password,
}

impl Registration {
    /// Check the form and build the sign-up request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking required fields, email shape,
    /// password confirmation, password length and terms in that order.
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();

        if first_name.is_empty()
            || last_name.is_empty()
            || email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        if !self.agree_terms {
            return Err(ValidationError::TermsNotAccepted);
        }

        Ok(NewUser {
            name: format!("{first_name} {last_name}"),
            email: normalize_email(email),
            password: self.password.clone(),
        })
    }
}

/// Sign-in form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email
    pub email: String,

    /// Password
    pub password: Password,
}

impl Credentials {
    /// Create credentials with a normalized email.
    pub fn new(email: &str, password: Password) -> Self {
        Self {
            email: normalize_email(email),
            password,
        }
    }

    /// Check both fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] when either field is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        Ok(())
    }
}
