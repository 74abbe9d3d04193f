//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use common::models::TaskStatus;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().chars().count() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Failed to compile email regex"));

    if !regex.is_match(email) {
        return Err("Valid email is required".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    Ok(())
}

/// Validate a task title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("Title must be less than 100 characters".to_string());
    }

    Ok(())
}

/// Validate a task description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err("Description must be less than 500 characters".to_string());
    }

    Ok(())
}

/// Parse a task status
pub fn parse_status(status: &str) -> Result<TaskStatus, String> {
    status
        .parse()
        .map_err(|_| "Status must be pending, in-progress, or completed".to_string())
}
