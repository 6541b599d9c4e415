//! Input validation utilities
//!
//! Validates configuration values and command arguments before they reach
//! the API client.

use crate::error::{CliError, ConfigError};

pub const MAX_PAGE_SIZE: usize = 1000;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    url::Url::parse(url).map_err(|e| {
        CliError::InvalidArguments(format!("Invalid URL '{}': {}", url, e))
    })?;

    Ok(())
}

/// Page sizes must be within 1..=1000
pub fn validate_page_size(page_size: usize) -> crate::Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidValue {
            field: "page_size".to_string(),
            value: page_size.to_string(),
            reason: format!("must be between 1 and {}", MAX_PAGE_SIZE),
        }
        .into());
    }
    Ok(())
}

/// Row slugs are path segments of the delete endpoint
pub fn validate_slug(slug: &str) -> crate::Result<()> {
    if slug.is_empty() || slug.contains(['/', '?', '#']) || slug.chars().any(char::is_whitespace) {
        return Err(CliError::InvalidArguments(format!("Invalid computer slug '{}'", slug)).into());
    }
    Ok(())
}
