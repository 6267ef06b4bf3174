//! Company API handlers.
//!
//! ```text
//! GET    /api/v1/companies
//! POST   /api/v1/companies
//! PUT    /api/v1/companies/{id}
//! DELETE /api/v1/companies/{id}
//! ```
//!
//! All routes are scoped to the session user; marking a company primary
//! demotes any other primary company the user has.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpsertEntityRequest;
use crate::domain::{Company, CompanyDraft, EntityId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_text};

/// Request payload for creating or updating a company.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    /// Company name; required.
    pub name: Option<String>,
    /// Industry or sector.
    pub industry: Option<String>,
    /// Short description of the business.
    pub description: Option<String>,
    /// Products and services offered.
    pub products_services: Option<String>,
    /// Value proposition summary.
    pub value_proposition: Option<String>,
    /// Target market description.
    pub target_market: Option<String>,
    /// Public website URL.
    pub website: Option<String>,
    /// Headcount bracket.
    pub company_size: Option<String>,
    /// Whether this company should become the user's primary one.
    #[serde(default)]
    pub is_primary: Option<bool>,
}

/// Response payload for a company.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    /// Company identifier.
    pub id: String,
    /// Company name.
    pub name: String,
    /// Industry or sector.
    pub industry: Option<String>,
    /// Short description of the business.
    pub description: Option<String>,
    /// Products and services offered.
    pub products_services: Option<String>,
    /// Value proposition summary.
    pub value_proposition: Option<String>,
    /// Target market description.
    pub target_market: Option<String>,
    /// Public website URL.
    pub website: Option<String>,
    /// Headcount bracket.
    pub company_size: Option<String>,
    /// Whether this is the user's primary company.
    pub is_primary: bool,
    /// Last-mutation timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(value: Company) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            industry: value.industry,
            description: value.description,
            products_services: value.products_services,
            value_proposition: value.value_proposition,
            target_market: value.target_market,
            website: value.website,
            company_size: value.company_size,
            is_primary: value.is_primary,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

fn parse_company_request(payload: CompanyRequest) -> Result<(CompanyDraft, bool), Error> {
    let CompanyRequest {
        name,
        industry,
        description,
        products_services,
        value_proposition,
        target_market,
        website,
        company_size,
        is_primary,
    } = payload;
    let name = require_text(name, FieldName::new("name"))?;
    let draft = CompanyDraft {
        name,
        industry,
        description,
        products_services,
        value_proposition,
        target_market,
        website,
        company_size,
    };
    Ok((draft, is_primary.unwrap_or(false)))
}

fn parse_company_id(raw: &str) -> Result<EntityId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(EntityId::from_uuid)
}

/// List the session user's companies.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    responses(
        (status = 200, description = "The user's companies", body = [CompanyResponse]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "listCompanies"
)]
#[get("/companies")]
pub async fn list_companies(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CompanyResponse>>> {
    let user_id = session.require_user_id()?;
    let companies = state.companies_query.list(&user_id).await?;
    Ok(web::Json(
        companies.into_iter().map(CompanyResponse::from).collect(),
    ))
}

/// Create a company for the session user.
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    request_body = CompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Concurrent modification", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "createCompany"
)]
#[post("/companies")]
pub async fn create_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CompanyRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let (draft, wants_primary) = parse_company_request(payload.into_inner())?;

    let company = state
        .companies
        .upsert(UpsertEntityRequest {
            owner_id: user_id,
            target_id: None,
            wants_primary,
            draft,
        })
        .await?;

    Ok(HttpResponse::Created().json(CompanyResponse::from(company)))
}

/// Update one of the session user's companies.
#[utoipa::path(
    put,
    path = "/api/v1/companies/{id}",
    request_body = CompanyRequest,
    params(("id" = String, Path, description = "Company identifier")),
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such company", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Concurrent modification", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "updateCompany"
)]
#[put("/companies/{id}")]
pub async fn update_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CompanyRequest>,
) -> ApiResult<web::Json<CompanyResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_company_id(&path.into_inner())?;
    let (draft, wants_primary) = parse_company_request(payload.into_inner())?;

    let company = state
        .companies
        .upsert(UpsertEntityRequest {
            owner_id: user_id,
            target_id: Some(id),
            wants_primary,
            draft,
        })
        .await?;

    Ok(web::Json(CompanyResponse::from(company)))
}

/// Delete one of the session user's companies.
#[utoipa::path(
    delete,
    path = "/api/v1/companies/{id}",
    params(("id" = String, Path, description = "Company identifier")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such company", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "deleteCompany"
)]
#[delete("/companies/{id}")]
pub async fn delete_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_company_id(&path.into_inner())?;

    state.companies.delete(&user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
