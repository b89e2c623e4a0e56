//! Declared form schemas and boundary validation.
//!
//! Every mutating route validates its body here before any domain call.
//! Violations are collected across all fields, not just the first, and
//! joined into one `InvalidRequest` message, so a form with three problems
//! reports three problems. Raw form structs keep every field optional;
//! presence is part of validation, not deserialisation.

use serde::Deserialize;

use crate::domain::auth::{Credentials, RegistrationDetails};
use crate::domain::listing::{ListingDetails, Price, Title};
use crate::domain::review::{Rating, ReviewBody};
use crate::domain::user::{Email, Username};
use crate::domain::Error;

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 8;

/// A single field failure discovered during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, format!("{field} is required"))
    }
}

/// Join all violations into one user-facing `InvalidRequest` error.
fn joined(violations: Vec<Violation>) -> Error {
    let message = violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Error::invalid_request(message)
}

fn collect<T, E: std::fmt::Display>(
    field: &'static str,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, E>,
    violations: &mut Vec<Violation>,
) -> Option<T> {
    match value {
        None => {
            violations.push(Violation::missing(field));
            None
        }
        Some(raw) => match parse(raw) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                violations.push(Violation::new(field, error.to_string()));
                None
            }
        },
    }
}

/// Raw listing fields as they arrive from the (multipart) form.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl ListingForm {
    /// Validate against the listing schema.
    pub fn validate(self) -> Result<ListingDetails, Error> {
        let mut violations = Vec::new();
        let title = collect("title", self.title, Title::new, &mut violations);
        let price = collect("price", self.price, |raw| Price::parse(&raw), &mut violations);
        let description = collect(
            "description",
            self.description,
            |raw| {
                let trimmed = raw.trim().to_owned();
                if trimmed.is_empty() {
                    Err("description must not be empty")
                } else {
                    Ok(trimmed)
                }
            },
            &mut violations,
        );
        let location = collect(
            "location",
            self.location,
            |raw| {
                let trimmed = raw.trim().to_owned();
                if trimmed.is_empty() {
                    Err("location must not be empty")
                } else {
                    Ok(trimmed)
                }
            },
            &mut violations,
        );

        match (title, price, description, location) {
            (Some(title), Some(price), Some(description), Some(location))
                if violations.is_empty() =>
            {
                Ok(ListingDetails {
                    title,
                    price,
                    description,
                    location,
                })
            }
            _ => Err(joined(violations)),
        }
    }
}

/// Raw review fields for `POST /campgrounds/{id}/reviews`.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    pub body: Option<String>,
    pub rating: Option<String>,
}

/// Validated review payload.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub body: ReviewBody,
    pub rating: Rating,
}

impl ReviewForm {
    /// Validate against the review schema.
    pub fn validate(self) -> Result<ReviewInput, Error> {
        let mut violations = Vec::new();
        let body = collect("body", self.body, ReviewBody::new, &mut violations);
        let rating = collect("rating", self.rating, |raw| Rating::parse(&raw), &mut violations);

        match (body, rating) {
            (Some(body), Some(rating)) if violations.is_empty() => {
                Ok(ReviewInput { body, rating })
            }
            _ => Err(joined(violations)),
        }
    }
}

/// Raw registration fields for `POST /register`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegisterForm {
    /// Validate against the registration schema.
    pub fn validate(self) -> Result<RegistrationDetails, Error> {
        let mut violations = Vec::new();
        let email = collect("email", self.email, Email::new, &mut violations);
        let username = collect("username", self.username, Username::new, &mut violations);
        let password = collect(
            "password",
            self.password,
            |raw| {
                if raw.chars().count() < PASSWORD_MIN {
                    Err(format!("password must be at least {PASSWORD_MIN} characters"))
                } else {
                    Ok(raw)
                }
            },
            &mut violations,
        );

        match (email, username, password) {
            (Some(email), Some(username), Some(password)) if violations.is_empty() => {
                Ok(RegistrationDetails::new(email, username, password))
            }
            _ => Err(joined(violations)),
        }
    }
}

/// Raw login fields for `POST /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    /// Validate against the login schema.
    pub fn validate(self) -> Result<Credentials, Error> {
        let mut violations = Vec::new();
        let username = collect("username", self.username, Username::new, &mut violations);
        let password = collect(
            "password",
            self.password,
            |raw| {
                if raw.is_empty() {
                    Err("password must not be empty")
                } else {
                    Ok(raw)
                }
            },
            &mut violations,
        );

        match (username, password) {
            (Some(username), Some(password)) if violations.is_empty() => {
                Ok(Credentials::new(username, password))
            }
            _ => Err(joined(violations)),
        }
    }
}
