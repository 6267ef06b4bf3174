//! Prompt template catalogue types.
//!
//! Templates are authored by users and browsed publicly; likes and comments
//! hang off a template. None of these types carry cross-row invariants —
//! uniqueness of a like per `(template, user)` pair is a storage concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum accepted length for a template title, in characters.
pub const PROMPT_TITLE_MAX: usize = 200;
/// Maximum accepted length for a comment body, in characters.
pub const COMMENT_BODY_MAX: usize = 2000;

/// A reusable prompt template authored by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Authoring user.
    pub author_id: UserId,
    /// Display title.
    pub title: String,
    /// Optional short description.
    pub description: Option<String>,
    /// The template text itself.
    pub content: String,
    /// Optional category slug.
    pub category: Option<String>,
    /// BCP 47 language tag of the template text.
    pub language: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Attributes submitted when creating a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDraft {
    /// Display title.
    pub title: String,
    /// Optional short description.
    pub description: Option<String>,
    /// The template text itself.
    pub content: String,
    /// Optional category slug.
    pub category: Option<String>,
    /// Language tag; defaults to English when absent.
    pub language: Option<String>,
}

/// A comment left on a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptComment {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Template the comment belongs to.
    pub prompt_id: Uuid,
    /// Commenting user.
    pub author_id: UserId,
    /// Comment text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Listing row returned by catalogue searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummary {
    /// Template identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Optional short description.
    pub description: Option<String>,
    /// Optional category slug.
    pub category: Option<String>,
    /// Language tag.
    pub language: String,
    /// Number of likes.
    pub like_count: u64,
    /// Number of comments.
    pub comment_count: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Full template view with comments and viewer-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDetail {
    /// The template itself.
    pub template: PromptTemplate,
    /// Number of likes.
    pub like_count: u64,
    /// Comments, oldest first.
    pub comments: Vec<PromptComment>,
    /// Whether the requesting user has liked this template.
    ///
    /// Always `false` for anonymous viewers.
    pub viewer_has_liked: bool,
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    /// Whether the viewer now likes the template.
    pub liked: bool,
    /// Like count after the toggle.
    pub like_count: u64,
}

/// Catalogue search filter; all fields are optional and conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSearchFilter {
    /// Case-insensitive keyword matched against title and description.
    pub query: Option<String>,
    /// Exact category slug.
    pub category: Option<String>,
    /// Exact language tag.
    pub language: Option<String>,
}

impl PromptSearchFilter {
    /// Whether the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.category.is_none() && self.language.is_none()
    }
}
