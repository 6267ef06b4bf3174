//! Shared helpers for HTTP adapter unit tests.

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::{HttpResponse, web};

use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Session middleware with an ephemeral key for in-process test apps.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Test-only route handler persisting the path user id into the session.
///
/// Session issuance is out of scope for the service itself, so test apps
/// mount this under `/login-as/{id}` to mint authenticated cookies.
pub async fn login_as(
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let uuid = parse_uuid(&raw, FieldName::new("id"))?;
    session.persist_user(&UserId::from_uuid(uuid))?;
    Ok(HttpResponse::Ok().finish())
}
