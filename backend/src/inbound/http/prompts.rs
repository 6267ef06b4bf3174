//! Prompt catalogue API handlers.
//!
//! ```text
//! GET  /api/v1/prompts
//! GET  /api/v1/prompts/{id}
//! POST /api/v1/prompts
//! POST /api/v1/prompts/{id}/like
//! POST /api/v1/prompts/{id}/comments
//! ```
//!
//! Search and detail are public; authoring, likes, and comments require a
//! session.

use actix_web::{HttpResponse, get, post, web};
use pagination::{Cursor, Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Error, LikeState, PromptComment, PromptDetail, PromptDraft, PromptSearchFilter, PromptSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_text};

/// Query parameters accepted by the catalogue search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Keyword matched against title and description.
    pub q: Option<String>,
    /// Exact category slug.
    pub category: Option<String>,
    /// Exact language tag.
    pub language: Option<String>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
    /// Page size; clamped server-side.
    pub limit: Option<u32>,
}

/// Request payload for creating a template.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptCreateRequest {
    /// Display title; required.
    pub title: Option<String>,
    /// Optional short description.
    pub description: Option<String>,
    /// Template text; required.
    pub content: Option<String>,
    /// Optional category slug.
    pub category: Option<String>,
    /// Language tag; defaults to English.
    pub language: Option<String>,
}

/// Request payload for adding a comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Comment text; required.
    pub body: Option<String>,
}

/// Listing row in a search response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummaryResponse {
    /// Template identifier.
    pub id: String,
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
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

impl From<PromptSummary> for PromptSummaryResponse {
    fn from(value: PromptSummary) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            category: value.category,
            language: value.language,
            like_count: value.like_count,
            comment_count: value.comment_count,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Search response envelope.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptListResponse {
    /// Matching templates, newest first.
    pub items: Vec<PromptSummaryResponse>,
    /// Cursor for the next page, when one exists.
    pub next_cursor: Option<String>,
}

impl From<Page<PromptSummary>> for PromptListResponse {
    fn from(value: Page<PromptSummary>) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(PromptSummaryResponse::from)
                .collect(),
            next_cursor: value.next_cursor,
        }
    }
}

/// Comment in a detail response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    /// Comment identifier.
    pub id: String,
    /// Commenting user.
    pub author_id: String,
    /// Comment text.
    pub body: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

impl From<PromptComment> for CommentResponse {
    fn from(value: PromptComment) -> Self {
        Self {
            id: value.id.to_string(),
            author_id: value.author_id.to_string(),
            body: value.body,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Full template view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptDetailResponse {
    /// Template identifier.
    pub id: String,
    /// Authoring user.
    pub author_id: String,
    /// Display title.
    pub title: String,
    /// Optional short description.
    pub description: Option<String>,
    /// Template text.
    pub content: String,
    /// Optional category slug.
    pub category: Option<String>,
    /// Language tag.
    pub language: String,
    /// Number of likes.
    pub like_count: u64,
    /// Whether the session user has liked this template.
    pub viewer_has_liked: bool,
    /// Comments, oldest first.
    pub comments: Vec<CommentResponse>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last-mutation timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<PromptDetail> for PromptDetailResponse {
    fn from(value: PromptDetail) -> Self {
        let PromptDetail {
            template,
            like_count,
            comments,
            viewer_has_liked,
        } = value;
        Self {
            id: template.id.to_string(),
            author_id: template.author_id.to_string(),
            title: template.title,
            description: template.description,
            content: template.content,
            category: template.category,
            language: template.language,
            like_count,
            viewer_has_liked,
            comments: comments.into_iter().map(CommentResponse::from).collect(),
            created_at: template.created_at.to_rfc3339(),
            updated_at: template.updated_at.to_rfc3339(),
        }
    }
}

/// Like toggle response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// Whether the session user now likes the template.
    pub liked: bool,
    /// Like count after the toggle.
    pub like_count: u64,
}

impl From<LikeState> for LikeResponse {
    fn from(value: LikeState) -> Self {
        Self {
            liked: value.liked,
            like_count: value.like_count,
        }
    }
}

fn parse_page(cursor: Option<String>, limit: Option<u32>) -> Result<PageRequest, Error> {
    let cursor = cursor
        .as_deref()
        .map(str::parse::<Cursor>)
        .transpose()
        .map_err(|err| {
            Error::invalid_request(format!("invalid cursor: {err}"))
                .with_details(json!({ "field": "cursor" }))
        })?;
    Ok(PageRequest::new(limit, cursor))
}

fn parse_prompt_id(raw: &str) -> Result<Uuid, Error> {
    parse_uuid(raw, FieldName::new("id"))
}

/// Search the public prompt catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/prompts",
    params(SearchParams),
    security([]),
    responses(
        (status = 200, description = "Matching templates", body = PromptListResponse),
        (status = 400, description = "Invalid cursor or limit", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["prompts"],
    operation_id = "searchPrompts"
)]
#[get("/prompts")]
pub async fn search_prompts(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<PromptListResponse>> {
    let SearchParams {
        q,
        category,
        language,
        cursor,
        limit,
    } = params.into_inner();
    let page = parse_page(cursor, limit)?;
    let filter = PromptSearchFilter {
        query: q,
        category,
        language,
    };

    let results = state.prompts_query.search(filter, page).await?;
    Ok(web::Json(PromptListResponse::from(results)))
}

/// Fetch one template with comments and viewer-specific state.
#[utoipa::path(
    get,
    path = "/api/v1/prompts/{id}",
    params(("id" = String, Path, description = "Template identifier")),
    security([]),
    responses(
        (status = 200, description = "Template detail", body = PromptDetailResponse),
        (status = 400, description = "Malformed identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such template", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["prompts"],
    operation_id = "getPromptDetail"
)]
#[get("/prompts/{id}")]
pub async fn prompt_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PromptDetailResponse>> {
    let id = parse_prompt_id(&path.into_inner())?;
    // Anonymous viewers are fine here; the viewer only affects like state.
    let viewer = session.user_id()?;

    let detail = state.prompts_query.detail(id, viewer).await?;
    Ok(web::Json(PromptDetailResponse::from(detail)))
}

/// Create a template authored by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/prompts",
    request_body = PromptCreateRequest,
    responses(
        (status = 201, description = "Template created", body = PromptDetailResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["prompts"],
    operation_id = "createPrompt"
)]
#[post("/prompts")]
pub async fn create_prompt(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PromptCreateRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let PromptCreateRequest {
        title,
        description,
        content,
        category,
        language,
    } = payload.into_inner();
    let draft = PromptDraft {
        title: require_text(title, FieldName::new("title"))?,
        description,
        content: require_text(content, FieldName::new("content"))?,
        category,
        language,
    };

    let template = state.prompts.create(user_id, draft).await?;
    let detail = PromptDetail {
        like_count: 0,
        comments: Vec::new(),
        viewer_has_liked: false,
        template,
    };
    Ok(HttpResponse::Created().json(PromptDetailResponse::from(detail)))
}

/// Toggle the session user's like on a template.
#[utoipa::path(
    post,
    path = "/api/v1/prompts/{id}/like",
    params(("id" = String, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "New like state", body = LikeResponse),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such template", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["prompts"],
    operation_id = "togglePromptLike"
)]
#[post("/prompts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_prompt_id(&path.into_inner())?;

    let like = state.prompts.toggle_like(id, user_id).await?;
    Ok(web::Json(LikeResponse::from(like)))
}

/// Add a comment by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/prompts/{id}/comments",
    request_body = CommentRequest,
    params(("id" = String, Path, description = "Template identifier")),
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such template", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["prompts"],
    operation_id = "addPromptComment"
)]
#[post("/prompts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_prompt_id(&path.into_inner())?;
    let body = require_text(payload.into_inner().body, FieldName::new("body"))?;

    let comment = state.prompts.add_comment(id, user_id, body).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}
