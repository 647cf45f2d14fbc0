//! Proposal CRUD plus the structured-form save path.
//!
//! The flattened routes mirror the persistence contract one to one. The
//! `/form` routes run the codec: structured payloads are flattened on
//! the way in, records are re-expanded on the way out, the proposal
//! number is issued on first save and the revision bumps on every
//! structured edit-save.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use orcapro_core::codec::{self, dates};
use orcapro_core::domain::proposal::{ProposalForm, ProposalId, ProposalRecord};
use orcapro_core::sequence::{next_proposal_number, next_revision};
use orcapro_db::repositories::{ProposalRepository, SqlProposalRepository};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

const NOT_FOUND: &str = "Proposta não encontrada.";
const TITLE_REQUIRED: &str = "Título é obrigatório.";

fn repository(state: &AppState) -> SqlProposalRepository {
    SqlProposalRepository::new(state.db_pool.clone())
}

fn normalize_record_dates(record: &mut ProposalRecord) {
    record.data_proposta = dates::normalize(&record.data_proposta);
    record.documentos_data = dates::normalize(&record.documentos_data);
}

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProposalRecord>>, ApiError> {
    Ok(Json(repository(&state).list().await?))
}

pub async fn get_one(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProposalRecord>, ApiError> {
    let record = repository(&state)
        .find_by_id(&ProposalId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(record))
}

pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(mut record): Json<ProposalRecord>,
) -> Result<Json<ProposalRecord>, ApiError> {
    if record.titulo.trim().is_empty() {
        return Err(ApiError::BadRequest(TITLE_REQUIRED.to_string()));
    }
    normalize_record_dates(&mut record);

    let repository = repository(&state);
    if record.numero.trim().is_empty() {
        let numbers = repository.list_numbers().await?;
        record.numero = next_proposal_number(&numbers, &state.numbering);
    }
    if record.revisao.trim().is_empty() {
        record.revisao = "1.0".to_string();
    }

    Ok(Json(repository.create(record).await?))
}

pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut record): Json<ProposalRecord>,
) -> Result<Json<ProposalRecord>, ApiError> {
    if record.titulo.trim().is_empty() {
        return Err(ApiError::BadRequest(TITLE_REQUIRED.to_string()));
    }
    normalize_record_dates(&mut record);

    let updated = repository(&state)
        .update(&ProposalId(id), record)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(updated))
}

pub async fn remove(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    repository(&state).delete(&ProposalId(id)).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Expanded, structured view of a stored proposal.
pub async fn get_form(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProposalForm>, ApiError> {
    let record = repository(&state)
        .find_by_id(&ProposalId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(codec::expand_record(&record, &state.codec)))
}

/// Structured create: issues the next proposal number when none was
/// typed and starts the revision history at 1.0.
pub async fn create_form(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(mut form): Json<ProposalForm>,
) -> Result<Json<ProposalRecord>, ApiError> {
    form.validate()?;

    let repository = repository(&state);
    if form.numero.trim().is_empty() {
        let numbers = repository.list_numbers().await?;
        form.numero = next_proposal_number(&numbers, &state.numbering);
    }
    if form.revisao.trim().is_empty() {
        form.revisao = "1.0".to_string();
    }

    Ok(Json(repository.create(codec::flatten_form(&form)).await?))
}

/// Structured edit-save: bumps the stored revision, recomputes the
/// total, flattens and persists.
pub async fn update_form(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut form): Json<ProposalForm>,
) -> Result<Json<ProposalRecord>, ApiError> {
    form.validate()?;

    let repository = repository(&state);
    let id = ProposalId(id);
    let existing = repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    if form.numero.trim().is_empty() {
        form.numero = existing.numero.clone();
    }
    form.revisao = next_revision(&existing.revisao);
    let record = codec::flatten_form(&form);

    let updated = repository
        .update(&id, record)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, State};
    use axum::Json;
    use rust_decimal::Decimal;

    use orcapro_core::domain::proposal::{ChecklistField, LineItem, ProposalForm, ProposalRecord};
    use orcapro_core::domain::user::Perfil;

    use crate::auth::AuthUser;
    use crate::errors::ApiError;
    use crate::routes::tests::{claims, migrated_state};

    use super::{create, create_form, get_form, list, update_form};

    fn user() -> AuthUser {
        AuthUser(claims(Perfil::Usuario))
    }

    fn sample_form() -> ProposalForm {
        ProposalForm {
            titulo: "Fabricação de estrutura metálica".to_string(),
            cliente_nome: "Acme S/A".to_string(),
            escopo: ChecklistField {
                selected: vec!["Inspeção Dimensional;".to_string()],
                extra: vec!["Içamento próprio;".to_string()],
            },
            itens: vec![LineItem {
                descricao: "Viga W150".to_string(),
                un: "Kg".to_string(),
                qtd: Decimal::from(1200),
                valor: "9.80".parse().unwrap(),
            }],
            ..ProposalForm::default()
        }
    }

    #[tokio::test]
    async fn create_requires_a_title() {
        let state = migrated_state().await;
        let record = ProposalRecord::default();
        let error = create(user(), State(state), Json(record)).await.err().expect("should fail");
        assert!(matches!(error, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn structured_create_assigns_number_and_first_revision() {
        let state = migrated_state().await;

        let Json(created) =
            create_form(user(), State(state.clone()), Json(sample_form())).await.expect("create");

        assert_eq!(created.numero, "260001");
        assert_eq!(created.revisao, "1.0");
        assert_eq!(created.valor_total, "11760.00".parse::<Decimal>().unwrap());

        let Json(second) =
            create_form(user(), State(state), Json(sample_form())).await.expect("create");
        assert_eq!(second.numero, "260002");
    }

    #[tokio::test]
    async fn structured_save_bumps_the_revision_each_time() {
        let state = migrated_state().await;

        let Json(created) =
            create_form(user(), State(state.clone()), Json(sample_form())).await.expect("create");

        let Json(form) = get_form(user(), State(state.clone()), Path(created.id.0.clone()))
            .await
            .expect("expand");
        let Json(after_first) = update_form(
            user(),
            State(state.clone()),
            Path(created.id.0.clone()),
            Json(form.clone()),
        )
        .await
        .expect("first save");
        assert_eq!(after_first.revisao, "2.0");

        let Json(after_second) =
            update_form(user(), State(state.clone()), Path(created.id.0.clone()), Json(form))
                .await
                .expect("second save");
        assert_eq!(after_second.revisao, "3.0");
    }

    #[tokio::test]
    async fn expanded_form_round_trips_checklists_through_storage() {
        let state = migrated_state().await;

        let Json(created) =
            create_form(user(), State(state.clone()), Json(sample_form())).await.expect("create");
        let Json(form) =
            get_form(user(), State(state), Path(created.id.0)).await.expect("expand");

        assert_eq!(form.escopo.selected, vec!["Inspeção Dimensional;".to_string()]);
        assert_eq!(form.escopo.extra, vec!["Içamento próprio;".to_string()]);
    }

    #[tokio::test]
    async fn typed_numbers_are_respected_on_structured_create() {
        let state = migrated_state().await;

        let mut form = sample_form();
        form.numero = "270123".to_string();
        let Json(created) =
            create_form(user(), State(state.clone()), Json(form)).await.expect("create");
        assert_eq!(created.numero, "270123");

        let Json(records) = list(user(), State(state)).await.expect("list");
        assert_eq!(records.len(), 1);
    }
}
