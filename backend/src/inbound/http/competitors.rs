//! Competitor API handlers.
//!
//! ```text
//! GET    /api/v1/competitors
//! POST   /api/v1/competitors
//! PUT    /api/v1/competitors/{id}
//! DELETE /api/v1/competitors/{id}
//! ```
//!
//! Mirrors the company surface; competitors share the owner-partitioned
//! primary-flag shape and the same exclusivity guarantee.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpsertEntityRequest;
use crate::domain::{Competitor, CompetitorDraft, EntityId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_text};

/// Request payload for creating or updating a competitor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorRequest {
    /// Competitor name; required.
    pub name: Option<String>,
    /// Public website URL.
    pub website: Option<String>,
    /// Observed strengths.
    pub strengths: Option<String>,
    /// Observed weaknesses.
    pub weaknesses: Option<String>,
    /// Pricing strategy notes.
    pub pricing_strategy: Option<String>,
    /// Market position summary.
    pub market_position: Option<String>,
    /// Whether this competitor should become the user's primary one.
    #[serde(default)]
    pub is_primary: Option<bool>,
}

/// Response payload for a competitor.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorResponse {
    /// Competitor identifier.
    pub id: String,
    /// Competitor name.
    pub name: String,
    /// Public website URL.
    pub website: Option<String>,
    /// Observed strengths.
    pub strengths: Option<String>,
    /// Observed weaknesses.
    pub weaknesses: Option<String>,
    /// Pricing strategy notes.
    pub pricing_strategy: Option<String>,
    /// Market position summary.
    pub market_position: Option<String>,
    /// Whether this is the user's primary competitor.
    pub is_primary: bool,
    /// Last-mutation timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<Competitor> for CompetitorResponse {
    fn from(value: Competitor) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            website: value.website,
            strengths: value.strengths,
            weaknesses: value.weaknesses,
            pricing_strategy: value.pricing_strategy,
            market_position: value.market_position,
            is_primary: value.is_primary,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

fn parse_competitor_request(payload: CompetitorRequest) -> Result<(CompetitorDraft, bool), Error> {
    let CompetitorRequest {
        name,
        website,
        strengths,
        weaknesses,
        pricing_strategy,
        market_position,
        is_primary,
    } = payload;
    let name = require_text(name, FieldName::new("name"))?;
    let draft = CompetitorDraft {
        name,
        website,
        strengths,
        weaknesses,
        pricing_strategy,
        market_position,
    };
    Ok((draft, is_primary.unwrap_or(false)))
}

fn parse_competitor_id(raw: &str) -> Result<EntityId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(EntityId::from_uuid)
}

/// List the session user's competitors.
#[utoipa::path(
    get,
    path = "/api/v1/competitors",
    responses(
        (status = 200, description = "The user's competitors", body = [CompetitorResponse]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["competitors"],
    operation_id = "listCompetitors"
)]
#[get("/competitors")]
pub async fn list_competitors(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CompetitorResponse>>> {
    let user_id = session.require_user_id()?;
    let competitors = state.competitors_query.list(&user_id).await?;
    Ok(web::Json(
        competitors
            .into_iter()
            .map(CompetitorResponse::from)
            .collect(),
    ))
}

/// Create a competitor for the session user.
#[utoipa::path(
    post,
    path = "/api/v1/competitors",
    request_body = CompetitorRequest,
    responses(
        (status = 201, description = "Competitor created", body = CompetitorResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Concurrent modification", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["competitors"],
    operation_id = "createCompetitor"
)]
#[post("/competitors")]
pub async fn create_competitor(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CompetitorRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let (draft, wants_primary) = parse_competitor_request(payload.into_inner())?;

    let competitor = state
        .competitors
        .upsert(UpsertEntityRequest {
            owner_id: user_id,
            target_id: None,
            wants_primary,
            draft,
        })
        .await?;

    Ok(HttpResponse::Created().json(CompetitorResponse::from(competitor)))
}

/// Update one of the session user's competitors.
#[utoipa::path(
    put,
    path = "/api/v1/competitors/{id}",
    request_body = CompetitorRequest,
    params(("id" = String, Path, description = "Competitor identifier")),
    responses(
        (status = 200, description = "Competitor updated", body = CompetitorResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such competitor", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Concurrent modification", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["competitors"],
    operation_id = "updateCompetitor"
)]
#[put("/competitors/{id}")]
pub async fn update_competitor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CompetitorRequest>,
) -> ApiResult<web::Json<CompetitorResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_competitor_id(&path.into_inner())?;
    let (draft, wants_primary) = parse_competitor_request(payload.into_inner())?;

    let competitor = state
        .competitors
        .upsert(UpsertEntityRequest {
            owner_id: user_id,
            target_id: Some(id),
            wants_primary,
            draft,
        })
        .await?;

    Ok(web::Json(CompetitorResponse::from(competitor)))
}

/// Delete one of the session user's competitors.
#[utoipa::path(
    delete,
    path = "/api/v1/competitors/{id}",
    params(("id" = String, Path, description = "Competitor identifier")),
    responses(
        (status = 204, description = "Competitor deleted"),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such competitor", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["competitors"],
    operation_id = "deleteCompetitor"
)]
#[delete("/competitors/{id}")]
pub async fn delete_competitor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_competitor_id(&path.into_inner())?;

    state.competitors.delete(&user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
