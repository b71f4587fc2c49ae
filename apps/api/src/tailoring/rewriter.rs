//! Rewrite collaborator: turns a resume plus a job description into a tailored resume.
//!
//! `AppState` holds an `Arc<dyn Rewriter>`: `LlmRewriter` in production, stubs in tests.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::tailoring::prompts::{build_rewrite_prompt, REWRITE_SYSTEM};

#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Returns the rewritten resume as raw model text (not yet normalized).
    async fn rewrite(&self, resume_text: &str, jd_text: &str) -> Result<String, AppError>;
}

pub struct LlmRewriter {
    llm: LlmClient,
}

impl LlmRewriter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Rewriter for LlmRewriter {
    async fn rewrite(&self, resume_text: &str, jd_text: &str) -> Result<String, AppError> {
        let prompt = build_rewrite_prompt(resume_text, jd_text);
        debug!(prompt_chars = prompt.len(), "Requesting resume rewrite");

        self.llm
            .complete(&prompt, REWRITE_SYSTEM)
            .await
            .map_err(|e| AppError::RewriteFailure(e.to_string()))
    }
}
