use anyhow::{anyhow, Result};

/// Longest first or last name accepted from the interactive flow.
pub const MAX_NAME_LENGTH: usize = 64;

/// Checks a first or last name typed by the user and returns it trimmed.
pub fn validate_person_name(input: &str) -> Result<String> {
    let name = input.trim();

    if name.is_empty() {
        return Err(anyhow!("cannot be empty"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(anyhow!("cannot be longer than {} characters", MAX_NAME_LENGTH));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("cannot contain line breaks"));
    }

    Ok(name.to_string())
}
