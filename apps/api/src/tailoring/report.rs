use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alignment::AlignmentReport;
use crate::layout::StyleName;

const HIGH_CONFIDENCE_DELTA: i32 = 12;
const MEDIUM_CONFIDENCE_DELTA: i32 = 5;

/// How much the rewrite moved the coverage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_delta(delta: i32) -> Self {
        if delta >= HIGH_CONFIDENCE_DELTA {
            ConfidenceBand::High
        } else if delta >= MEDIUM_CONFIDENCE_DELTA {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Body of `POST /api/v1/tailor`.
#[derive(Debug, Clone, Serialize)]
pub struct TailorResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Normalized rewrite. The client posts this back to the render endpoint.
    pub output: String,
    pub template: StyleName,
    pub name_slug: String,
    pub before: AlignmentReport,
    pub after: AlignmentReport,
    pub before_score: u32,
    pub after_score: u32,
    pub delta: i32,
    pub confidence: ConfidenceBand,
}

impl TailorResponse {
    pub fn new(
        output: String,
        template: StyleName,
        name_slug: String,
        before: AlignmentReport,
        after: AlignmentReport,
    ) -> Self {
        let before_score = before.coverage_percent;
        let after_score = after.coverage_percent;
        let delta = after_score as i32 - before_score as i32;

        Self {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            output,
            template,
            name_slug,
            before,
            after,
            before_score,
            after_score,
            delta,
            confidence: ConfidenceBand::from_delta(delta),
        }
    }
}
