//! Surface formatting carried from an original value onto its replacement

/// Makes `replacement` look like `original`: period usage, then surrounding whitespace,
/// then letter case.
pub fn match_formatting(original: &str, replacement: &str) -> String {
    let punctuated = match_punctuation(original, replacement);
    let spaced = match_whitespace(original, &punctuated);
    match_case(original, &spaced)
}

/// Only whitespace and case; used where periods carry meaning
pub fn match_whitespace_and_case(original: &str, replacement: &str) -> String {
    match_case(original, &match_whitespace(original, replacement))
}

pub fn match_punctuation(original: &str, replacement: &str) -> String {
    if !original.contains('.') {
        replacement.replace('.', "")
    } else if original.trim_end().ends_with('.') && !replacement.trim_end().ends_with('.') {
        format!("{}.", replacement.trim_end())
    } else {
        replacement.to_string()
    }
}

pub fn match_whitespace(original: &str, replacement: &str) -> String {
    let core = replacement.trim();
    if original.trim().is_empty() {
        return core.to_string();
    }
    let leading_end = original.len() - original.trim_start().len();
    let trailing_start = original.trim_end().len();
    format!(
        "{}{}{}",
        &original[..leading_end],
        core,
        &original[trailing_start..]
    )
}

pub fn match_case(original: &str, replacement: &str) -> String {
    if is_upper(original) {
        replacement.to_uppercase()
    } else if is_lower(original) {
        replacement.to_lowercase()
    } else {
        replacement.to_string()
    }
}

/// At least one cased character, and every cased character upper case
pub fn is_upper(value: &str) -> bool {
    let mut cased = false;
    for c in value.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

pub fn is_lower(value: &str) -> bool {
    let mut cased = false;
    for c in value.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}
