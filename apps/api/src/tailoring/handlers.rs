//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::alignment::score;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::layout::{
    classify_document, normalize, render_document, template, ClassifiedLine, OutputFormat,
    StyleName, StyleProfile,
};
use crate::state::AppState;
use crate::tailoring::report::TailorResponse;
use crate::tailoring::slug::name_slug;

const MISSING_JD: &str = "Please paste the Job Description.";
const MISSING_RESUME: &str = "Please upload a PDF or DOCX resume.";
const NOTHING_TO_RENDER: &str = "Nothing to download. Run tailoring first.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Fields of the multipart tailoring form.
#[derive(Debug, Default)]
struct TailorForm {
    jd: String,
    file_name: Option<String>,
    file_bytes: Bytes,
    display_name: Option<String>,
    template: Option<String>,
}

impl TailorForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = TailorForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "jd" => form.jd = field_text(field).await?,
                "display_name" => form.display_name = Some(field_text(field).await?),
                "template" => form.template = Some(field_text(field).await?),
                "resume_file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.file_bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Resolves the requested template, logging when an unknown name falls back to the default.
fn resolve_template(requested: Option<&str>) -> StyleProfile {
    let name = requested.unwrap_or(StyleName::default().as_str());
    if name.parse::<StyleName>().is_err() {
        warn!("Unknown template '{name}', falling back to {}", StyleName::default());
    }
    template::resolve(name)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form field: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub normalized: String,
    pub lines: Vec<ClassifiedLine>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
///
/// Extracts the uploaded resume, scores it against the JD, rewrites it, and scores
/// the normalized rewrite. Fails before any scoring when the JD or upload is missing.
pub async fn handle_tailor(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TailorResponse>, AppError> {
    let form = TailorForm::read(&mut multipart).await?;

    let jd = form.jd.trim().to_string();
    if jd.is_empty() {
        return Err(AppError::EmptyInput(MISSING_JD.to_string()));
    }
    let file_name = match form.file_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(AppError::EmptyInput(MISSING_RESUME.to_string())),
    };

    let template = resolve_template(form.template.as_deref()).name;
    let slug = name_slug(form.display_name.as_deref());
    let upload_bytes = form.file_bytes.len();

    let extract_name = file_name.clone();
    let file_bytes = form.file_bytes;
    let resume_text = tokio::task::spawn_blocking(move || extract_text(&extract_name, &file_bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))??;

    let before = score(&resume_text, &jd);
    let rewritten = state.rewriter.rewrite(&resume_text, &jd).await?;
    let output = normalize(&rewritten);
    let after = score(&output, &jd);

    info!(
        file = %file_name,
        bytes = upload_bytes,
        template = %template,
        before = before.coverage_percent,
        after = after.coverage_percent,
        "Tailored resume"
    );

    Ok(Json(TailorResponse::new(output, template, slug, before, after)))
}

/// POST /api/v1/render/:format
///
/// Lays out posted text as a PDF or DOCX attachment named after the display name.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let format: OutputFormat = format.parse().map_err(AppError::Validation)?;
    if request.text.trim().is_empty() {
        return Err(AppError::EmptyInput(NOTHING_TO_RENDER.to_string()));
    }

    let profile = resolve_template(request.template.as_deref());
    let file_name = format!(
        "{}.{}",
        name_slug(request.display_name.as_deref()),
        format.extension()
    );
    let title = state.config.document_title.clone();
    let text = request.text;

    let document =
        tokio::task::spawn_blocking(move || render_document(&text, &profile, &title, format))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}"))
            })??;

    info!(
        format = %document.format,
        pages = document.page_count,
        bytes = document.bytes.len(),
        "Rendered {file_name}"
    );

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
        (
            HeaderName::from_static("x-page-count"),
            document.page_count.to_string(),
        ),
    ];

    Ok((StatusCode::OK, headers, document.bytes).into_response())
}

/// POST /api/v1/layout/preview
///
/// Returns the normalized text and each line's role, without rendering.
pub async fn handle_layout_preview(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let normalized = normalize(&request.text);
    let lines = classify_document(&normalized);
    Ok(Json(PreviewResponse { normalized, lines }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
