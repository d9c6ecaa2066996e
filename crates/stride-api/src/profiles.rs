//! Handlers for `/profiles` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profiles` | Full records |
//! | `GET`    | `/profiles/summary` | `{profile_id, name}` with the full name |
//! | `POST`   | `/profiles` | Body: [`NewProfile`]; 201, or 409 on id/email conflict |
//! | `GET`    | `/profiles/search` | `?email=<fragment>`; summaries labelled with the email |
//! | `GET`    | `/profiles/older` | `?age=<years>` |
//! | `GET`    | `/profiles/by-email` | `?email=<exact>`; 404 if not found |
//! | `GET`    | `/profiles/{id}` | 404 if not found |
//! | `PATCH`  | `/profiles/{id}` | Body: [`ProfilePatch`] |
//! | `DELETE` | `/profiles/{id}` | 204, or 404 if nothing was deleted |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use stride_core::{
  ProfileLookup as _, ProfileService as _,
  profile::{NewProfile, Profile, ProfilePatch, ProfileSummary},
  store::{ProfileStore, SessionStore},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /profiles`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.profiles.list_all().await?))
}

/// `GET /profiles/summary`
pub async fn summary<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ProfileSummary>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.profiles.list_summaries().await?))
}

/// `GET /profiles/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let profile = state
    .profiles
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;
  Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
  pub email: String,
}

/// `GET /profiles/by-email?email=<exact>`
pub async fn by_email<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<EmailParams>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let profile = state
    .profiles
    .get_by_email(&params.email)
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no profile with email {:?}", params.email))
    })?;
  Ok(Json(profile))
}

/// `GET /profiles/search?email=<fragment>`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<EmailParams>,
) -> Result<Json<Vec<ProfileSummary>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let found = state
    .profiles
    .search_by_email_fragment(&params.email)
    .await?;
  Ok(Json(found.iter().map(ProfileSummary::by_email).collect()))
}

#[derive(Debug, Deserialize)]
pub struct AgeParams {
  pub age: u32,
}

/// `GET /profiles/older?age=<years>`
pub async fn older<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<AgeParams>,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.profiles.older_than(params.age).await?))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /profiles`: returns 201 + the stored [`Profile`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewProfile>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let profile = state.profiles.create(body).await?;
  Ok((StatusCode::CREATED, Json(profile)))
}

/// `PATCH /profiles/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.profiles.update(id, patch).await?))
}

/// `DELETE /profiles/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ProfileStore + SessionStore,
{
  if state.profiles.delete(id).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("profile {id} not found")))
  }
}
