//! Request validators for the users module

use super::models::{RegisterRequest, UpdateProfileRequest};
use crate::common::{ValidationResult, Validator};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Loose email shape check; real verification is out of scope
fn is_plausible_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    parts.len() == 2 && !parts[0].is_empty() && parts[1].contains('.')
}

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.first_name.trim().is_empty() {
            result.add_error("first_name", "First name is required");
        }

        if data.last_name.trim().is_empty() {
            result.add_error("last_name", "Last name is required");
        }

        if !is_plausible_email(&data.email) {
            result.add_error("email", "A valid email address is required");
        }

        if data.password.len() < MIN_PASSWORD_LENGTH {
            result.add_error(
                "password",
                &format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }

        result
    }
}

pub struct UpdateProfileValidator;

impl Validator<UpdateProfileRequest> for UpdateProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.user_id.trim().is_empty() {
            result.add_error("user_id", "User ID is required");
        }

        if !is_plausible_email(&data.email) {
            result.add_error("email", "A valid email address is required");
        }

        if data.first_name.trim().is_empty() {
            result.add_error("first_name", "First name is required");
        }

        if data.last_name.trim().is_empty() {
            result.add_error("last_name", "Last name is required");
        }

        if let Some(password) = data.password.as_deref() {
            if !password.is_empty() && password.len() < MIN_PASSWORD_LENGTH {
                result.add_error(
                    "password",
                    &format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
                );
            }
        }

        result
    }
}
