//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    companies, competitors, prompt_comments, prompt_likes, prompt_templates, user_profiles,
};

// ---------------------------------------------------------------------------
// Company models
// ---------------------------------------------------------------------------

/// Row struct for reading from the companies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub products_services: Option<String>,
    pub value_proposition: Option<String>,
    pub target_market: Option<String>,
    pub website: Option<String>,
    pub company_size: Option<String>,
    pub is_primary: bool,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new company records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
pub(crate) struct NewCompanyRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub industry: Option<&'a str>,
    pub description: Option<&'a str>,
    pub products_services: Option<&'a str>,
    pub value_proposition: Option<&'a str>,
    pub target_market: Option<&'a str>,
    pub website: Option<&'a str>,
    pub company_size: Option<&'a str>,
    pub is_primary: bool,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating existing company records.
///
/// `treat_none_as_null` so clearing an optional attribute persists the NULL
/// instead of silently keeping the old value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = companies)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CompanyUpdate<'a> {
    pub name: &'a str,
    pub industry: Option<&'a str>,
    pub description: Option<&'a str>,
    pub products_services: Option<&'a str>,
    pub value_proposition: Option<&'a str>,
    pub target_market: Option<&'a str>,
    pub website: Option<&'a str>,
    pub company_size: Option<&'a str>,
    pub is_primary: bool,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Competitor models
// ---------------------------------------------------------------------------

/// Row struct for reading from the competitors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = competitors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompetitorRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub pricing_strategy: Option<String>,
    pub market_position: Option<String>,
    pub is_primary: bool,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new competitor records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = competitors)]
pub(crate) struct NewCompetitorRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub website: Option<&'a str>,
    pub strengths: Option<&'a str>,
    pub weaknesses: Option<&'a str>,
    pub pricing_strategy: Option<&'a str>,
    pub market_position: Option<&'a str>,
    pub is_primary: bool,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating existing competitor records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = competitors)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CompetitorUpdate<'a> {
    pub name: &'a str,
    pub website: Option<&'a str>,
    pub strengths: Option<&'a str>,
    pub weaknesses: Option<&'a str>,
    pub pricing_strategy: Option<&'a str>,
    pub market_position: Option<&'a str>,
    pub is_primary: bool,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Prompt catalogue models
// ---------------------------------------------------------------------------

/// Row struct for reading from the prompt_templates table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prompt_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PromptTemplateRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new template records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prompt_templates)]
pub(crate) struct NewPromptTemplateRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub content: &'a str,
    pub category: Option<&'a str>,
    pub language: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating like records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prompt_likes)]
pub(crate) struct NewPromptLikeRow {
    pub prompt_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the prompt_comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prompt_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PromptCommentRow {
    pub id: Uuid,
    pub prompt_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prompt_comments)]
pub(crate) struct NewPromptCommentRow<'a> {
    pub id: Uuid,
    pub prompt_id: Uuid,
    pub user_id: Uuid,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile models
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable/changeset struct for upserting profile records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileRecord<'a> {
    pub user_id: Uuid,
    pub display_name: Option<&'a str>,
    pub job_title: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
