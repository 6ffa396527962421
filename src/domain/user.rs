//! User domain entity and input validation.
//!
//! Validation is independent of storage: email uniqueness is enforced by the
//! persistence layer at write time, because only it can see concurrent
//! writes. Every rule is evaluated, so a payload violating several rules
//! reports one message per rule.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Minimum accepted age.
pub const MIN_AGE: i32 = 18;
/// Maximum accepted age.
pub const MAX_AGE: i32 = 100;

pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_EMAIL_INVALID: &str = "Invalid email address";
pub const MSG_AGE_MIN: &str = "Age must be at least 18";
pub const MSG_AGE_MAX: &str = "Age must be less than or equal to 100";

/// Rule evaluation order; violation messages are reported in this order.
const FIELD_ORDER: [&str; 3] = ["name", "email", "age"];

/// Local part, "@", then a domain containing at least one dot.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// User domain entity. The id is assigned by the persistence layer at
/// creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Unvalidated request payload for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Normalized record accepted by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub age: i32,
}

impl UserInput {
    /// Normalize a validated payload into the record handed to persistence.
    pub fn into_record(self) -> UserRecord {
        UserRecord {
            name: self.name.trim().to_string(),
            email: self.email,
            age: self.age,
        }
    }
}

impl Validate for UserInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", violation("name_required", MSG_NAME_REQUIRED));
        }
        if !EMAIL_RE.is_match(&self.email) {
            errors.add("email", violation("email_format", MSG_EMAIL_INVALID));
        }
        if self.age < MIN_AGE {
            errors.add("age", violation("age_min", MSG_AGE_MIN));
        } else if self.age > MAX_AGE {
            errors.add("age", violation("age_max", MSG_AGE_MAX));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Flatten validation errors into human-readable messages, in rule order.
pub fn violation_messages(errors: &ValidationErrors) -> Vec<String> {
    let fields = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|field| fields.get(field))
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .collect()
}
