//! User management, admin only. An admin cannot deactivate or delete
//! their own account.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use orcapro_core::domain::user::{User, UserId, UserInput};
use orcapro_core::hash_password;
use orcapro_db::repositories::{SqlUserRepository, UserRepository};

use crate::auth::AdminUser;
use crate::errors::ApiError;
use crate::state::AppState;

const NOT_FOUND: &str = "Usuário não encontrado.";
const DUPLICATE_LOGIN: &str = "Esse login já está em uso.";
const SELF_DEACTIVATE: &str = "Você não pode desativar sua própria conta.";
const SELF_DELETE: &str = "Você não pode excluir sua própria conta.";

fn repository(state: &AppState) -> SqlUserRepository {
    SqlUserRepository::new(state.db_pool.clone())
}

fn map_conflict(error: ApiError) -> ApiError {
    match error {
        ApiError::BadRequest(_) => ApiError::BadRequest(DUPLICATE_LOGIN.to_string()),
        other => other,
    }
}

pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(repository(&state).list().await?))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    input.validate_for_create()?;

    let user = User {
        nome: input.nome.trim().to_string(),
        login: input.normalized_login(),
        perfil: input.perfil,
        ativo: input.ativo.unwrap_or(true),
        ..User::default()
    };
    let created = repository(&state)
        .create(user, hash_password(&input.senha))
        .await
        .map_err(|error| map_conflict(error.into()))?;
    Ok(Json(created))
}

pub async fn update(
    AdminUser(claims): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    if claims.id == id && input.ativo == Some(false) {
        return Err(ApiError::BadRequest(SELF_DEACTIVATE.to_string()));
    }

    let user = User {
        nome: input.nome.trim().to_string(),
        login: input.normalized_login(),
        perfil: input.perfil,
        ativo: input.ativo.unwrap_or(true),
        ..User::default()
    };
    // A blank password keeps the stored digest.
    let senha_hash =
        if input.senha.trim().is_empty() { None } else { Some(hash_password(&input.senha)) };

    let updated = repository(&state)
        .update(&UserId(id), user, senha_hash)
        .await
        .map_err(|error| map_conflict(error.into()))?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(updated))
}

pub async fn remove(
    AdminUser(claims): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if claims.id == id {
        return Err(ApiError::BadRequest(SELF_DELETE.to_string()));
    }
    repository(&state).delete(&UserId(id)).await?;
    Ok(Json(json!({ "ok": true })))
}
