//! Title validation, applied before a command is built.

use thiserror::Error;

/// Longest title the API accepts
pub const MAX_TITLE_LEN: usize = 100;

/// Why user input was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Blank after trimming
    #[error("Title is required")]
    TitleRequired,

    /// Longer than [`MAX_TITLE_LEN`] characters
    #[error("Title must be at most {max} characters, got {len}")]
    TitleTooLong {
        /// Limit
        max: usize,
        /// Actual length in characters
        len: usize,
    },
}

/// Trim a title and check it is usable
///
/// # Errors
///
/// - [`ValidationError::TitleRequired`] if nothing but whitespace was entered
/// - [`ValidationError::TitleTooLong`] if the trimmed title is over the limit
///
/// # Examples
///
/// ```
/// use todolists::{validate_title, ValidationError};
///
/// assert_eq!(validate_title("  What to buy "), Ok("What to buy".to_string()));
/// assert_eq!(validate_title("   "), Err(ValidationError::TitleRequired));
/// ```
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_LEN,
            len,
        });
    }

    Ok(trimmed.to_string())
}
