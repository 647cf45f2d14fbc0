//! Customer CRUD. Approval is a tri-state toggle carried as an optional
//! boolean; no audit trail is kept for it.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use orcapro_core::domain::client::{Client, ClientId};
use orcapro_db::repositories::{ClientRepository, SqlClientRepository};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

const NOT_FOUND: &str = "Cliente não encontrado.";
const LEGAL_NAME_REQUIRED: &str = "Razão social é obrigatória.";

fn repository(state: &AppState) -> SqlClientRepository {
    SqlClientRepository::new(state.db_pool.clone())
}

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(repository(&state).list().await?))
}

pub async fn get_one(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, ApiError> {
    let client = repository(&state)
        .find_by_id(&ClientId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(client))
}

pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(client): Json<Client>,
) -> Result<Json<Client>, ApiError> {
    if client.razao_social.trim().is_empty() {
        return Err(ApiError::BadRequest(LEGAL_NAME_REQUIRED.to_string()));
    }
    Ok(Json(repository(&state).create(client).await?))
}

pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(client): Json<Client>,
) -> Result<Json<Client>, ApiError> {
    if client.razao_social.trim().is_empty() {
        return Err(ApiError::BadRequest(LEGAL_NAME_REQUIRED.to_string()));
    }
    let updated = repository(&state)
        .update(&ClientId(id), client)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(updated))
}

pub async fn remove(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repository(&state).delete(&ClientId(id)).await?;
    Ok(Json(json!({ "ok": true })))
}
