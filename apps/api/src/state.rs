use std::sync::Arc;

use crate::config::Config;
use crate::tailoring::rewriter::Rewriter;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Rewrite collaborator. `LlmRewriter` in production, a stub in tests.
    pub rewriter: Arc<dyn Rewriter>,
}
