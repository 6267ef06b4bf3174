//! Profile API handlers.
//!
//! ```text
//! GET /api/v1/profile
//! PUT /api/v1/profile
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ProfileDraft, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

/// Request payload for updating the profile.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    /// Display name; required, validated server-side.
    pub display_name: Option<String>,
    /// Free-form job title.
    pub job_title: Option<String>,
    /// Free-form company name.
    pub company_name: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
}

/// Response payload for the profile.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Owning user.
    pub user_id: String,
    /// Display name, absent until first saved.
    pub display_name: Option<String>,
    /// Free-form job title.
    pub job_title: Option<String>,
    /// Free-form company name.
    pub company_name: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Last-mutation timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            display_name: value.display_name.map(String::from),
            job_title: value.job_title,
            company_name: value.company_name,
            bio: value.bio,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Fetch the session user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "The user's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state.profile_query.fetch(&user_id).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

/// Update the session user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let ProfileRequest {
        display_name,
        job_title,
        company_name,
        bio,
    } = payload.into_inner();
    let draft = ProfileDraft {
        display_name: require_text(display_name, FieldName::new("displayName"))?,
        job_title,
        company_name,
        bio,
    };

    let profile = state.profile.update(user_id, draft).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, UserId};
    use chrono::Utc;

    #[test]
    fn profile_response_maps_domain_values() {
        let user_id = UserId::random();
        let profile = UserProfile {
            user_id: user_id.clone(),
            display_name: Some(DisplayName::new("Ada Lovelace").expect("display name")),
            job_title: Some("Analyst".to_owned()),
            company_name: None,
            bio: None,
            updated_at: Utc::now(),
        };

        let response = ProfileResponse::from(profile);
        assert_eq!(response.user_id, user_id.to_string());
        assert_eq!(response.display_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn profile_response_keeps_missing_display_name_absent() {
        let profile = UserProfile::new_default(UserId::random(), Utc::now());
        let response = ProfileResponse::from(profile);
        assert!(response.display_name.is_none());
    }
}
