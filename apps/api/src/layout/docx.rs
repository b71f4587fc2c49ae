//! Flow-document output: a minimal WordprocessingML package.
//!
//! Each engine block becomes one `<w:p>`; its runs keep true bold, size and colour,
//! the block's indent and spacing become paragraph properties, and the word
//! processor re-wraps and paginates.

use std::io::{Cursor, Write};

use chrono::Utc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::layout::surface::{Block, Surface, TextRun};
use crate::layout::template::{Margins, StyleProfile};
use crate::layout::RenderError;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// Points to twentieths of a point.
fn twips(pt: f32) -> i64 {
    (pt * 20.0).round() as i64
}

/// Points to half-points, the unit of `<w:sz>`.
fn half_points(pt: f32) -> i64 {
    (pt * 2.0).round() as i64
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            c if !is_xml_char(c) => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// XML 1.0 `Char`: tab, LF, CR and everything from U+0020 except U+FFFE and U+FFFF.
/// Surrogates cannot occur in a Rust `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

struct OpenParagraph {
    xml: String,
    /// Whether the next run needs a separating space.
    needs_space: bool,
}

pub struct DocxSurface {
    page_width: f32,
    page_height: f32,
    margins: Margins,
    body: String,
    open: Option<OpenParagraph>,
}

impl DocxSurface {
    pub fn new(profile: &StyleProfile) -> Self {
        Self {
            page_width: profile.page_width,
            page_height: profile.page_height,
            margins: profile.margins,
            body: String::new(),
            open: None,
        }
    }

    pub fn document_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
                "{body}",
                r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/>"#,
                r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="720" w:footer="720" w:gutter="0"/>"#,
                "</w:sectPr></w:body></w:document>"
            ),
            body = self.body,
            w = twips(self.page_width),
            h = twips(self.page_height),
            top = twips(self.margins.top),
            right = twips(self.margins.right),
            bottom = twips(self.margins.bottom),
            left = twips(self.margins.left),
        )
    }

    /// Writes the zip package.
    pub fn into_bytes(mut self, title: &str) -> Result<Vec<u8>, RenderError> {
        self.close_paragraph();
        let document = self.document_xml();
        let core = core_properties_xml(title);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let parts: [(&str, &str); 4] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML),
            ("_rels/.rels", ROOT_RELS_XML),
            ("word/document.xml", &document),
            ("docProps/core.xml", &core),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)
                .map_err(|e| RenderError::Docx(e.to_string()))?;
            zip.write_all(content.as_bytes())?;
        }
        let cursor = zip
            .finish()
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    fn close_paragraph(&mut self) {
        if let Some(paragraph) = self.open.take() {
            self.body.push_str(&paragraph.xml);
            self.body.push_str("</w:p>");
        }
    }
}

fn core_properties_xml(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title><dc:creator>tailor</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
            "</cp:coreProperties>"
        ),
        title = escape_xml(title),
        created = Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn paragraph_open(block: &Block) -> String {
    let mut xml = format!(
        r#"<w:p><w:pPr><w:spacing w:before="{}" w:after="{}" w:line="{}" w:lineRule="atLeast"/>"#,
        twips(block.space_before),
        twips(block.space_after),
        twips(block.line_height),
    );
    if block.indent > 0.0 || block.hanging > 0.0 {
        xml.push_str(&format!(
            r#"<w:ind w:left="{}" w:hanging="{}"/>"#,
            twips(block.indent),
            twips(block.hanging),
        ));
    }
    xml.push_str("</w:pPr>");
    xml
}

fn run_xml(run: &TextRun, leading_space: bool) -> String {
    let font = run.face.flow_font();
    let size = half_points(run.size);
    let bold = if run.face.is_bold() { "<w:b/><w:bCs/>" } else { "" };
    let text = if leading_space {
        format!(" {}", run.text)
    } else {
        run.text.clone()
    };
    format!(
        concat!(
            "<w:r><w:rPr>",
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#,
            "{bold}",
            r#"<w:color w:val="{color}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#,
            "</w:rPr>",
            r#"<w:t xml:space="preserve">{text}</w:t></w:r>"#
        ),
        font = font,
        bold = bold,
        color = run.color.hex(),
        size = size,
        text = escape_xml(&text),
    )
}

impl Surface for DocxSurface {
    // Pagination is left to the word processor.
    fn start_page(&mut self) {}

    fn begin_block(&mut self, block: &Block) {
        self.close_paragraph();
        self.open = Some(OpenParagraph {
            xml: paragraph_open(block),
            needs_space: false,
        });
    }

    fn draw_run(&mut self, run: &TextRun) {
        let paragraph = self.open.get_or_insert_with(|| OpenParagraph {
            xml: paragraph_open(&Block::default()),
            needs_space: false,
        });
        paragraph.xml.push_str(&run_xml(run, paragraph.needs_space));
        paragraph.needs_space = !run.text.ends_with(char::is_whitespace);
    }

    fn end_block(&mut self) {
        self.close_paragraph();
    }

    fn blank(&mut self, height: f32) {
        self.close_paragraph();
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:spacing w:before="0" w:after="0" w:line="{}" w:lineRule="exact"/></w:pPr></w:p>"#,
            twips(height)
        ));
    }
}
