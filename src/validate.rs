use regex::Regex;

/// Reject null bytes and non-whitespace control characters, and enforce
/// a length cap, before text reaches the database.
pub fn check_text(input: &str, max_length: usize) -> Result<(), String> {
    if input.contains('\0') {
        return Err("Input contains null bytes".to_string());
    }

    for ch in input.chars() {
        if ch.is_control() && ch != '\n' && ch != '\r' && ch != '\t' {
            return Err("Input contains invalid control characters".to_string());
        }
    }

    if input.len() > max_length {
        return Err(format!(
            "Input exceeds maximum length of {} characters",
            max_length
        ));
    }

    Ok(())
}

/// Usernames: 3-50 characters, letters, digits, underscores and hyphens.
pub fn valid_username(username: &str) -> bool {
    let username_regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    (3..=50).contains(&username.len()) && username_regex.is_match(username)
}
