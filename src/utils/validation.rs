use super::response;
use crate::modules::user::repository::AccountType;
use axum::{http::StatusCode, response::Response};
use regex::Regex;
use std::{borrow::Cow, sync::OnceLock};
use validator::{ValidationError, ValidationErrors};

pub const USERNAME_MAX_CHARS: usize = 50;

fn phone_number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^09[0-9]{9}$").expect("Invalid phone number regex"))
}

fn otp_code_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[0-9]{5}$").expect("Invalid otp code regex"))
}

fn username_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Invalid username regex"))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::from(message))
}

/// National mobile format: 11 digits starting with `09`.
pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    match phone_number_regex().is_match(phone_number) {
        true => Ok(()),
        false => Err(invalid(
            "INVALID_PHONE_NUMBER",
            "invalid phone number format",
        )),
    }
}

pub fn validate_otp_code(code: &str) -> Result<(), ValidationError> {
    match otp_code_regex().is_match(code) {
        true => Ok(()),
        false => Err(invalid(
            "INVALID_OTP_CODE",
            "OTP code must be exactly 5 digits",
        )),
    }
}

pub fn validate_account_type(account_type: &str) -> Result<(), ValidationError> {
    account_type.parse::<AccountType>().map(|_| ()).map_err(|_| {
        invalid(
            "INVALID_ACCOUNT_TYPE",
            "accountType must be one of: personal, children, business",
        )
    })
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username_regex().is_match(username) {
        return Err(invalid(
            "INVALID_USERNAME",
            "username may only contain letters, digits, and underscores",
        ));
    }

    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(invalid(
            "USERNAME_TOO_LONG",
            "username must be 50 characters or fewer",
        ));
    }

    Ok(())
}

/// Picks a deterministic, user-facing message out of a validation failure.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errors)| errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| String::from("invalid request"))
}

pub fn into_response(errors: ValidationErrors) -> Response {
    response::err(StatusCode::BAD_REQUEST, first_message(&errors))
}
