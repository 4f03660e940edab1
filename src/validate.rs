use crate::clip::STAGING_MARKER;
use crate::error::ClipError;

/// Trims the name, turns spaces into underscores and rejects characters that are not
/// valid in file names on common platforms.
pub fn sanitize_stem(new_name_input: &str) -> Result<String, ClipError> {
    let trimmed = new_name_input.trim();
    if trimmed.is_empty() {
        return Err(ClipError::InvalidName(
            new_name_input.to_string(),
            "the name cannot be empty",
        ));
    }
    let sanitized = trimmed.replace(' ', "_");

    if sanitized
        .chars()
        .any(|c| matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
    {
        return Err(ClipError::InvalidName(
            sanitized,
            "it contains invalid characters (< > : \" / \\ | ? *)",
        ));
    }
    if sanitized.contains(STAGING_MARKER) {
        return Err(ClipError::InvalidName(
            sanitized,
            "names containing '_output' are reserved for staging files",
        ));
    }
    if sanitized == "." || sanitized == ".." {
        return Err(ClipError::InvalidName(sanitized, "not a file name"));
    }
    Ok(sanitized)
}
