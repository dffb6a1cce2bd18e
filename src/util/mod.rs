//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: scheme checks before handing links to the system browser
//!   and before talking to the engagement API
//! - **Text processing**: Unicode-aware string width calculation and truncation
//! - **Dates**: long-form localized dates and compact relative ages
//!
//! # Examples
//!
//! ```
//! use lenta::util::{validate_url_for_open, display_width, truncate_to_width};
//!
//! // Validate a source link before opening it
//! let url = validate_url_for_open("https://example.com/story").unwrap();
//!
//! // Calculate display width for proper terminal rendering
//! let width = display_width("Hello 世界"); // Returns 10 (6 + 2*2)
//!
//! // Truncate to fit terminal width
//! let truncated = truncate_to_width("Long article title", 15);
//! ```

mod date;
mod text;
mod url_validator;

pub use date::{format_long_date, format_relative_time, DateLocale};
pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_api_base_url, validate_url_for_open, UrlValidationError};

/// Maximum accepted comment draft length in characters.
pub const MAX_COMMENT_LENGTH: usize = 2000;
