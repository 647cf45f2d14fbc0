//! Document endpoint: expands the stored proposal and hands the
//! rendered artifact to the browser, either as a print-ready HTML
//! stream or as a downloadable HTML-Word package.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use serde::Deserialize;

use orcapro_core::codec;
use orcapro_core::domain::proposal::ProposalId;
use orcapro_core::render::{DocumentArtifact, DocumentFormat};
use orcapro_db::repositories::{ProposalRepository, SqlProposalRepository};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub formato: String,
}

pub async fn render_document(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, ApiError> {
    let repository = SqlProposalRepository::new(state.db_pool.clone());
    let record = repository
        .find_by_id(&ProposalId(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Proposta não encontrada.".to_string()))?;

    let form = codec::expand_record(&record, &state.codec);
    let format = DocumentFormat::parse(&query.formato);
    let artifact = state.renderer.render(&form, format).await?;

    into_response(artifact, format)
        .map_err(|error| ApiError::Internal(format!("response assembly failed: {error}")))
}

fn into_response(
    artifact: DocumentArtifact,
    format: DocumentFormat,
) -> Result<Response, axum::http::Error> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type);

    match format {
        DocumentFormat::Html => builder.body(Body::from(artifact.body)),
        DocumentFormat::Doc => builder
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            )
            .body(Body::from(artifact.body)),
    }
}
