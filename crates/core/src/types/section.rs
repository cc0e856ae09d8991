//! Editable portfolio content sections.
//!
//! A section is a named JSON document (for example `"about"` or
//! `"experience"`) that the frontend can use in place of its built-in copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors for section updates.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// The section name is blank.
    #[error("section_name is required")]
    MissingName,
    /// The section name exceeds the length limit.
    #[error("section_name must be at most {max} characters")]
    NameTooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// A stored portfolio section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSection {
    pub section_name: String,
    pub content: serde_json::Value,
    pub last_updated: DateTime<Utc>,
}

impl PortfolioSection {
    /// Maximum length of a section name, in characters.
    pub const MAX_NAME_CHARS: usize = 100;

    /// Validate a name and build a section stamped with `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] if the trimmed name is blank or too long.
    pub fn new(
        section_name: &str,
        content: serde_json::Value,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, SectionError> {
        let name = section_name.trim();
        if name.is_empty() {
            return Err(SectionError::MissingName);
        }
        if name.chars().count() > Self::MAX_NAME_CHARS {
            return Err(SectionError::NameTooLong {
                max: Self::MAX_NAME_CHARS,
            });
        }

        Ok(Self {
            section_name: name.to_owned(),
            content,
            last_updated,
        })
    }
}
