//! Checks run on the recipe form before it is submitted.

use std::collections::HashMap;

/// Submitted form fields by name.
pub type FormData = HashMap<String, String>;

pub const MIN_SERVINGS: i64 = 1;
pub const MAX_SERVINGS: i64 = 50;

fn blank(form: &FormData, field: &str) -> bool {
    form.get(field).map_or(true, |value| value.trim().is_empty())
}

/// Messages for every required field that is missing, in form order.
/// An empty result means the form may be submitted.
pub fn validate_form(form: &FormData) -> Vec<String> {
    let mut errors = Vec::new();

    if blank(form, "title") {
        errors.push("Recipe title is required".to_string());
    }
    if blank(form, "description") {
        errors.push("Description is required".to_string());
    }
    if form.get("difficulty").map_or(true, |value| value.is_empty()) {
        errors.push("Difficulty level is required".to_string());
    }

    errors
}

/// `#RRGGBB`, as the server accepts for tag colors.
pub fn validate_tag_color(color: &str) -> Result<(), String> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err("color must be a valid hex color code".to_string())
    }
}

pub fn validate_servings(servings: i64) -> Result<(), String> {
    if (MIN_SERVINGS..=MAX_SERVINGS).contains(&servings) {
        Ok(())
    } else {
        Err(format!(
            "Servings must be between {} and {}",
            MIN_SERVINGS, MAX_SERVINGS
        ))
    }
}
