//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer
//! - **Schemas**: Domain type wrappers that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification backs Swagger UI in debug builds.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Prompt platform backend API",
        description = "JSON interface for the prompt catalogue, profiles, and \
            owner-scoped company and competitor records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::companies::list_companies,
        crate::inbound::http::companies::create_company,
        crate::inbound::http::companies::update_company,
        crate::inbound::http::companies::delete_company,
        crate::inbound::http::competitors::list_competitors,
        crate::inbound::http::competitors::create_competitor,
        crate::inbound::http::competitors::update_competitor,
        crate::inbound::http::competitors::delete_competitor,
        crate::inbound::http::prompts::search_prompts,
        crate::inbound::http::prompts::prompt_detail,
        crate::inbound::http::prompts::create_prompt,
        crate::inbound::http::prompts::toggle_like,
        crate::inbound::http::prompts::add_comment,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "companies", description = "Owner-scoped company records"),
        (name = "competitors", description = "Owner-scoped competitor records"),
        (name = "prompts", description = "Public prompt catalogue"),
        (name = "profile", description = "The session user's profile"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_document_registers_all_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/companies",
            "/api/v1/companies/{id}",
            "/api/v1/competitors",
            "/api/v1/competitors/{id}",
            "/api/v1/prompts",
            "/api/v1/prompts/{id}",
            "/api/v1/prompts/{id}/like",
            "/api/v1/prompts/{id}/comments",
            "/api/v1/profile",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("crate.domain.Error"));
    }
}
