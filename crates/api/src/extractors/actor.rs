//! Actor context extractor.
//!
//! Every authenticated route takes an explicit [`Actor`]: the declared user
//! id is resolved against the profiles table on each request, so handlers
//! receive identity and role as a parameter instead of reading ambient
//! session state.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use persistence::repositories::ProfileRepository;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::profile::{Profile, UserRole};

/// Header carrying the acting user's id.
///
/// Identity issuance (sign-in, tokens) is handled upstream of this service;
/// the gateway forwards the authenticated subject in this header.
pub const ACTOR_ID_HEADER: &str = "X-User-Id";

/// The resolved acting user for a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
    pub email: String,
    display_name: String,
}

impl Actor {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether the actor may see a resource owned by this client/agent pair.
    pub fn can_access(&self, client_id: Uuid, agent_id: Uuid) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Agent => self.id == agent_id,
            UserRole::Client => self.id == client_id,
        }
    }
}

impl From<Profile> for Actor {
    fn from(profile: Profile) -> Self {
        let display_name = profile.display_name();
        Self {
            id: profile.id,
            role: profile.role,
            email: profile.email,
            display_name,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

        let actor_id = Uuid::parse_str(raw)
            .map_err(|_| ApiError::Unauthorized("Invalid X-User-Id header".to_string()))?;

        let profile = ProfileRepository::new(state.pool.clone())
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

        let profile: Profile = profile.into();
        Ok(profile.into())
    }
}
