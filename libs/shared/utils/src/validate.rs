use std::sync::OnceLock;

use regex::Regex;

use shared_models::error::AppError;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

fn validation_error(field: &str, reason: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Non-empty after trim.
pub fn require_str(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(validation_error(field, "is required"));
    }
    Ok(())
}

/// Basic `local@domain.tld` shape. Format check only.
pub fn validate_email(field: &str, value: &str) -> Result<(), AppError> {
    if !email_regex().is_match(value.trim()) {
        return Err(validation_error(field, "must be a valid email address"));
    }
    Ok(())
}

/// Digits-only after stripping separators; 10 to 15 digits accepted.
pub fn validate_phone(field: &str, value: &str) -> Result<(), AppError> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 || digits.len() > 15 {
        return Err(validation_error(field, "must contain 10 to 15 digits"));
    }
    Ok(())
}

/// Canonical time-slot format: 24-hour `HH:MM`.
pub fn validate_time_slot(field: &str, value: &str) -> Result<(), AppError> {
    let parts: Vec<&str> = value.split(':').collect();
    let valid = parts.len() == 2
        && parts[0].len() == 2
        && parts[1].len() == 2
        && matches!(parts[0].parse::<u8>(), Ok(h) if h <= 23)
        && matches!(parts[1].parse::<u8>(), Ok(m) if m <= 59);

    if !valid {
        return Err(validation_error(field, "must be in HH:MM format"));
    }
    Ok(())
}

/// Membership in a fixed allowed-value set.
pub fn validate_enum(field: &str, value: &str, allowed: &[&str]) -> Result<(), AppError> {
    if !allowed.contains(&value) {
        return Err(validation_error(
            field,
            &format!("must be one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}
