//! User profile data model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

/// Validation errors returned by [`DisplayName::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    /// The display name was empty after trimming.
    EmptyDisplayName,
    /// The display name was shorter than the minimum.
    DisplayNameTooShort {
        /// The enforced minimum length.
        min: usize,
    },
    /// The display name was longer than the maximum.
    DisplayNameTooLong {
        /// The enforced maximum length.
        max: usize,
    },
    /// The display name contained characters outside the allowed set.
    DisplayNameInvalidCharacters,
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_ ]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("display name regex failed to compile: {error}"))
    })
}

/// Human readable display name shown on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, ProfileValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, ProfileValidationError> {
        if display_name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyDisplayName);
        }

        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(ProfileValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(ProfileValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }

        if !display_name_regex().is_match(&display_name) {
            return Err(ProfileValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A user's public profile; one row per user, last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Owning user.
    pub user_id: UserId,
    /// Validated display name; `None` until the user sets one.
    pub display_name: Option<DisplayName>,
    /// Free-form job title.
    pub job_title: Option<String>,
    /// Free-form company name.
    pub company_name: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Last-mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Empty profile used before a user has saved anything.
    pub fn new_default(user_id: UserId, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display_name: None,
            job_title: None,
            company_name: None,
            bio: None,
            updated_at: at,
        }
    }
}

/// Attributes submitted when updating a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    /// Display name; validated before persisting.
    pub display_name: String,
    /// Free-form job title.
    pub job_title: Option<String>,
    /// Free-form company name.
    pub company_name: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
}
