//! Handlers for `/sessions` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/sessions` | All sessions |
//! | `POST`  | `/sessions` | Body: [`NewSession`]; 201, 409 if the id is taken, 422 if the owner is unknown |
//! | `GET`   | `/sessions/ended` | `?after=<RFC 3339>`; strictly after, running sessions excluded |
//! | `GET`   | `/sessions/owner/{owner_id}` | 422 if the profile is unknown |
//! | `GET`   | `/sessions/category/{category}` | e.g. `RUNNING` |
//! | `GET`   | `/sessions/{id}` | 404 if not found |
//! | `PATCH` | `/sessions/{id}` | Body: [`SessionPatch`] |

use std::str::FromStr as _;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use stride_core::{
  session::{ActivityType, NewSession, Session, SessionPatch},
  store::{ProfileStore, SessionStore},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /sessions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Session>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.sessions.list_all().await?))
}

/// `GET /sessions/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let session = state
    .sessions
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))?;
  Ok(Json(session))
}

/// `GET /sessions/owner/{owner_id}`
pub async fn by_owner<S>(
  State(state): State<AppState<S>>,
  Path(owner_id): Path<Uuid>,
) -> Result<Json<Vec<Session>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.sessions.list_by_owner(owner_id).await?))
}

/// `GET /sessions/category/{category}`
pub async fn by_category<S>(
  State(state): State<AppState<S>>,
  Path(category): Path<String>,
) -> Result<Json<Vec<Session>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let category = ActivityType::from_str(&category).map_err(|_| {
    ApiError::BadRequest(format!("unknown activity type {category:?}"))
  })?;
  Ok(Json(state.sessions.list_by_category(category).await?))
}

#[derive(Debug, Deserialize)]
pub struct EndedParams {
  pub after: DateTime<Utc>,
}

/// `GET /sessions/ended?after=<RFC 3339>`
pub async fn ended<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<EndedParams>,
) -> Result<Json<Vec<Session>>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.sessions.list_ended_after(params.after).await?))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /sessions`: returns 201 + the stored [`Session`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewSession>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore + SessionStore,
{
  let session = state.sessions.create(body).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

/// `PATCH /sessions/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<SessionPatch>,
) -> Result<Json<Session>, ApiError>
where
  S: ProfileStore + SessionStore,
{
  Ok(Json(state.sessions.update(id, patch).await?))
}
