// Resume re-layout: normalize -> classify -> lay out -> encode.
// One classifier and one engine drive both output formats through the Surface trait.
// Rendering is CPU-bound; the HTTP layer calls it inside tokio::task::spawn_blocking.

pub mod classify;
pub mod docx;
pub mod engine;
pub mod font_metrics;
pub mod normalize;
pub mod pdf;
pub mod surface;
pub mod template;
pub mod wrap;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use classify::{classify_document, ClassifiedLine};
pub use normalize::normalize;
pub use template::{StyleName, StyleProfile};

use crate::layout::docx::DocxSurface;
use crate::layout::engine::LayoutEngine;
use crate::layout::pdf::PdfSurface;
use crate::layout::surface::Surface;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(String),
    #[error("DOCX packaging failed: {0}")]
    Docx(String),
    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            other => Err(format!("unsupported output format '{other}', expected pdf or docx")),
        }
    }
}

/// A finished document, ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    /// Pages the engine laid out. For DOCX the word processor has the final say.
    pub page_count: usize,
}

/// Runs the whole pipeline over model output.
pub fn render_document(
    text: &str,
    profile: &StyleProfile,
    title: &str,
    format: OutputFormat,
) -> Result<RenderedDocument, RenderError> {
    let lines = classify_document(&normalize(text));

    let (bytes, page_count) = match format {
        OutputFormat::Pdf => {
            let (surface, pages) = lay_out(profile, PdfSurface::new(profile), &lines);
            (surface.into_bytes(title)?, pages)
        }
        OutputFormat::Docx => {
            let (surface, pages) = lay_out(profile, DocxSurface::new(profile), &lines);
            (surface.into_bytes(title)?, pages)
        }
    };

    debug!(
        format = %format,
        template = %profile.name,
        lines = lines.len(),
        pages = page_count,
        bytes = bytes.len(),
        "Rendered document"
    );

    Ok(RenderedDocument {
        format,
        bytes,
        page_count,
    })
}

fn lay_out<S: Surface>(
    profile: &StyleProfile,
    surface: S,
    lines: &[ClassifiedLine],
) -> (S, usize) {
    let mut engine = LayoutEngine::new(profile, surface);
    engine.layout(lines);
    engine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    use proptest::prelude::*;

    use crate::layout::template::profile_for;

    fn document_xml(docx: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("valid zip");
        let mut part = archive.by_name("word/document.xml").expect("document part");
        let mut xml = String::new();
        part.read_to_string(&mut xml).expect("utf-8 part");
        xml
    }

    fn is_xml_illegal(c: char) -> bool {
        (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}'
    }

    fn assert_renders_cleanly(text: &str, profile: &StyleProfile) {
        let pdf = render_document(text, profile, "T", OutputFormat::Pdf).expect("pdf renders");
        lopdf::Document::load_mem(&pdf.bytes).expect("pdf parses back");
        let docx = render_document(text, profile, "T", OutputFormat::Docx).expect("docx renders");
        let xml = document_xml(&docx.bytes);
        assert!(
            !xml.chars().any(is_xml_illegal),
            "document.xml carries an XML-illegal character for input {text:?}"
        );
        assert_eq!(pdf.page_count, docx.page_count);
    }

    const RESUME: &str = "\
## Jane Doe
jane@example.com | +1 555 0100 | Berlin

**SUMMARY**
Backend engineer with a focus on reliability.

EXPERIENCE
Acme Corp - Senior Engineer
• Built a Rust ingestion pipeline
• Cut cloud spend by 30 percent

TECHNICAL SKILLS
Core stack
* Languages: Rust, Go, Python";

    #[test]
    fn test_render_pdf() {
        let profile = profile_for(StyleName::AtsBlue);
        let doc = render_document(RESUME, &profile, "TAILORED RESUME", OutputFormat::Pdf)
            .expect("pdf renders");
        assert_eq!(doc.format, OutputFormat::Pdf);
        assert_eq!(doc.page_count, 1);
        let parsed = lopdf::Document::load_mem(&doc.bytes).expect("valid pdf");
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn test_render_docx() {
        let profile = profile_for(StyleName::AtsClassic);
        let doc = render_document(RESUME, &profile, "TAILORED RESUME", OutputFormat::Docx)
            .expect("docx renders");
        assert_eq!(doc.format, OutputFormat::Docx);
        assert!(doc.bytes.starts_with(b"PK"), "docx is a zip package");
    }

    #[test]
    fn test_both_formats_agree_on_page_count() {
        let profile = profile_for(StyleName::AtsClassic);
        let mut long = String::from("Jane\n");
        for i in 0..120 {
            long.push_str(&format!("- Delivered outcome number {i} for the team\n"));
        }
        let pdf = render_document(&long, &profile, "T", OutputFormat::Pdf).expect("pdf");
        let docx = render_document(&long, &profile, "T", OutputFormat::Docx).expect("docx");
        assert!(pdf.page_count > 1);
        assert_eq!(pdf.page_count, docx.page_count);
    }

    #[test]
    fn test_empty_text_renders_blank_page() {
        let profile = profile_for(StyleName::AtsClassic);
        let doc = render_document("", &profile, "T", OutputFormat::Pdf).expect("pdf");
        assert_eq!(doc.page_count, 1);
    }

    #[test]
    fn test_awkward_inputs_render_in_both_formats() {
        let profile = profile_for(StyleName::AtsClassic);
        let long_word = "x".repeat(5000);
        for text in [
            "\u{feff}",
            "\u{feff}Jane Doe",
            "山田 太郎\nソフトウェアエンジニア | taro@example.jp",
            "A\u{0}\n\u{2028}x\u{85}y",
            "Jane\u{1} Doe\nWorked at Acme\u{b}Corp\u{0}",
            "(unbalanced \\ parens",
            long_word.as_str(),
        ] {
            assert_renders_cleanly(text, &profile);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_any_text_renders_in_both_formats(s in r"(?s).{0,400}", blue in any::<bool>()) {
            let name = if blue { StyleName::AtsBlue } else { StyleName::AtsClassic };
            assert_renders_cleanly(&s, &profile_for(name));
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("pdf".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert_eq!("DOCX".parse::<OutputFormat>(), Ok(OutputFormat::Docx));
        assert!("txt".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Docx.extension(), "docx");
        assert_eq!(OutputFormat::Pdf.content_type(), "application/pdf");
    }
}
