use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;
use crate::{auth, documents};

pub mod clients;
pub mod manifests;
pub mod proposals;
pub mod users;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/usuarios", get(users::list).post(users::create))
        .route("/api/usuarios/{id}", put(users::update).delete(users::remove))
        .route("/api/clientes", get(clients::list).post(clients::create))
        .route(
            "/api/clientes/{id}",
            get(clients::get_one).put(clients::update).delete(clients::remove),
        )
        .route("/api/propostas", get(proposals::list).post(proposals::create))
        .route("/api/propostas/form", post(proposals::create_form))
        .route(
            "/api/propostas/{id}",
            get(proposals::get_one).put(proposals::update).delete(proposals::remove),
        )
        .route(
            "/api/propostas/{id}/form",
            get(proposals::get_form).put(proposals::update_form),
        )
        .route("/api/propostas/{id}/documento", get(documents::render_document))
        .route("/api/romaneios", get(manifests::list).post(manifests::create))
        .route(
            "/api/romaneios/{id}",
            get(manifests::get_one).put(manifests::update).delete(manifests::remove),
        )
        .with_state(state)
}
