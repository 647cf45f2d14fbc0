//! Login endpoint and bearer-token request guards.

use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use orcapro_core::auth::Claims;
use orcapro_core::domain::user::User;
use orcapro_core::verify_password;
use orcapro_db::repositories::{SqlUserRepository, UserRepository};

use crate::errors::ApiError;
use crate::state::AppState;

const MISSING_TOKEN: &str = "Token não fornecido. Faça login para continuar.";
const INVALID_TOKEN: &str = "Token inválido ou expirado. Faça login novamente.";
const ADMIN_ONLY: &str = "Acesso restrito a administradores.";

/// Authenticated requester. Extracting this rejects requests without a
/// valid bearer token.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(MISSING_TOKEN.to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized(MISSING_TOKEN.to_string()))?;

        let claims = state
            .tokens
            .verify(token, Utc::now())
            .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN.to_string()))?;
        Ok(Self(claims))
    }
}

/// Authenticated requester with the admin role.
pub struct AdminUser(pub Claims);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(ApiError::Forbidden(ADMIN_ONLY.to_string()));
        }
        Ok(Self(claims))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: User,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.login.trim().is_empty() || request.senha.is_empty() {
        return Err(ApiError::BadRequest("Login e senha são obrigatórios.".to_string()));
    }

    let users = SqlUserRepository::new(state.db_pool.clone());
    let credentials = users
        .find_credentials(&request.login)
        .await?
        .filter(|stored| verify_password(&request.senha, &stored.senha_hash))
        .ok_or_else(|| ApiError::Unauthorized("Login ou senha incorretos.".to_string()))?;

    if !credentials.user.ativo {
        return Err(ApiError::Forbidden(
            "Usuário desativado. Contate o administrador.".to_string(),
        ));
    }

    let token = state.tokens.issue(&credentials.user, state.token_ttl_hours, Utc::now());
    info!(
        event_name = "system.auth.login",
        login = %credentials.user.login,
        "user logged in"
    );

    Ok(Json(LoginResponse { token, usuario: credentials.user }))
}

pub async fn me(AuthUser(claims): AuthUser) -> Json<Claims> {
    Json(claims)
}
