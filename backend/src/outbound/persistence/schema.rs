//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Companies described by users.
    ///
    /// Partitioned by `user_id`; at most one row per user may carry
    /// `is_primary = true`, enforced transactionally by the adapter.
    companies (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Company name.
        name -> Varchar,
        /// Industry or sector.
        industry -> Nullable<Varchar>,
        /// Short description of the business.
        description -> Nullable<Text>,
        /// Products and services offered.
        products_services -> Nullable<Text>,
        /// Value proposition summary.
        value_proposition -> Nullable<Text>,
        /// Target market description.
        target_market -> Nullable<Varchar>,
        /// Public website URL.
        website -> Nullable<Varchar>,
        /// Headcount bracket.
        company_size -> Nullable<Varchar>,
        /// Exclusive primary flag.
        is_primary -> Bool,
        /// Optimistic-concurrency counter.
        revision -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Competitors profiled by users; same partitioned shape as companies.
    competitors (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Competitor name.
        name -> Varchar,
        /// Public website URL.
        website -> Nullable<Varchar>,
        /// Observed strengths.
        strengths -> Nullable<Text>,
        /// Observed weaknesses.
        weaknesses -> Nullable<Text>,
        /// Pricing strategy notes.
        pricing_strategy -> Nullable<Text>,
        /// Market position summary.
        market_position -> Nullable<Text>,
        /// Exclusive primary flag.
        is_primary -> Bool,
        /// Optimistic-concurrency counter.
        revision -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Prompt templates authored by users.
    prompt_templates (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Authoring user.
        author_id -> Uuid,
        /// Display title.
        title -> Varchar,
        /// Optional short description.
        description -> Nullable<Text>,
        /// Template text.
        content -> Text,
        /// Optional category slug.
        category -> Nullable<Varchar>,
        /// BCP 47 language tag.
        language -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (template, user) like; toggling deletes the row.
    prompt_likes (prompt_id, user_id) {
        /// Liked template.
        prompt_id -> Uuid,
        /// Liking user.
        user_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments on prompt templates.
    prompt_comments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Commented template.
        prompt_id -> Uuid,
        /// Commenting user.
        user_id -> Uuid,
        /// Comment text.
        body -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One profile row per user, last write wins.
    user_profiles (user_id) {
        /// Primary key: owning user.
        user_id -> Uuid,
        /// Validated display name.
        display_name -> Nullable<Varchar>,
        /// Free-form job title.
        job_title -> Nullable<Varchar>,
        /// Free-form company name.
        company_name -> Nullable<Varchar>,
        /// Free-form biography.
        bio -> Nullable<Text>,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(prompt_likes -> prompt_templates (prompt_id));
diesel::joinable!(prompt_comments -> prompt_templates (prompt_id));

diesel::allow_tables_to_appear_in_same_query!(prompt_templates, prompt_likes, prompt_comments);
