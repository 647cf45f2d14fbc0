//! Delivery manifest CRUD. Linking a manifest to a proposal copies the
//! proposal's number and client name at link time; later edits to the
//! proposal are deliberately not synced back.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use orcapro_core::codec::dates;
use orcapro_core::domain::manifest::{DeliveryManifest, ManifestId};
use orcapro_core::domain::proposal::ProposalId;
use orcapro_db::repositories::{
    ManifestRepository, ProposalRepository, SqlManifestRepository, SqlProposalRepository,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

const NOT_FOUND: &str = "Romaneio não encontrado.";
const NUMBER_REQUIRED: &str = "Número é obrigatório.";

fn repository(state: &AppState) -> SqlManifestRepository {
    SqlManifestRepository::new(state.db_pool.clone())
}

fn normalize_dates(manifest: &mut DeliveryManifest) {
    manifest.data_emissao = dates::normalize(&manifest.data_emissao);
    manifest.data_entrega = dates::normalize(&manifest.data_entrega);
}

/// Copy `numero` and `cliente_nome` from the linked proposal when the
/// link is being established or changed.
async fn denormalize_link(
    state: &AppState,
    manifest: &mut DeliveryManifest,
    previous_link: Option<&str>,
) -> Result<(), ApiError> {
    let Some(proposta_id) = manifest.proposta_id.clone() else {
        return Ok(());
    };
    if previous_link == Some(proposta_id.as_str()) {
        return Ok(());
    }

    let proposals = SqlProposalRepository::new(state.db_pool.clone());
    if let Some(proposal) = proposals.find_by_id(&ProposalId(proposta_id)).await? {
        manifest.proposta_numero = proposal.numero;
        manifest.cliente_nome = proposal.cliente_nome;
    }
    Ok(())
}

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryManifest>>, ApiError> {
    Ok(Json(repository(&state).list().await?))
}

pub async fn get_one(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryManifest>, ApiError> {
    let manifest = repository(&state)
        .find_by_id(&ManifestId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(manifest))
}

pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(mut manifest): Json<DeliveryManifest>,
) -> Result<Json<DeliveryManifest>, ApiError> {
    if manifest.numero.trim().is_empty() {
        return Err(ApiError::BadRequest(NUMBER_REQUIRED.to_string()));
    }
    normalize_dates(&mut manifest);
    denormalize_link(&state, &mut manifest, None).await?;
    Ok(Json(repository(&state).create(manifest).await?))
}

pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut manifest): Json<DeliveryManifest>,
) -> Result<Json<DeliveryManifest>, ApiError> {
    if manifest.numero.trim().is_empty() {
        return Err(ApiError::BadRequest(NUMBER_REQUIRED.to_string()));
    }
    normalize_dates(&mut manifest);

    let repository = repository(&state);
    let id = ManifestId(id);
    let existing = repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    denormalize_link(&state, &mut manifest, existing.proposta_id.as_deref()).await?;

    let updated = repository
        .update(&id, manifest)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(updated))
}

pub async fn remove(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repository(&state).delete(&ManifestId(id)).await?;
    Ok(Json(json!({ "ok": true })))
}
