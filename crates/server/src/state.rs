use std::sync::Arc;

use orcapro_core::auth::TokenService;
use orcapro_core::codec::CodecOptions;
use orcapro_core::render::DocumentRenderer;
use orcapro_core::sequence::NumberingOptions;
use orcapro_db::DbPool;

/// Shared request state: pool, token service, codec/numbering options
/// hoisted from config, and the document renderer.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub tokens: TokenService,
    pub token_ttl_hours: u64,
    pub numbering: NumberingOptions,
    pub codec: CodecOptions,
    pub renderer: Arc<DocumentRenderer>,
}
