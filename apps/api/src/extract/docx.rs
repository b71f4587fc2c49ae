//! Paragraph text from a WordprocessingML package.
//!
//! Only `word/document.xml` is read. Each `<w:p>` becomes one line built from its
//! `<w:t>` runs, with `<w:tab/>` as a tab and `<w:br/>` as a newline. Paragraphs that
//! are blank after trimming are dropped.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::ExtractError;

static DOCUMENT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>|</w:p>")
        .expect("document token regex")
});

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("entity regex")
});

pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    Ok(paragraph_text(&xml))
}

/// Joins the non-blank paragraphs of a `document.xml` body with newlines.
pub fn paragraph_text(xml: &str) -> String {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for token in DOCUMENT_TOKEN.captures_iter(xml) {
        match token.get(1) {
            Some(text) => current.push_str(&unescape(text.as_str())),
            None => match &token[0] {
                "<w:tab/>" => current.push('\t'),
                "<w:br/>" => current.push('\n'),
                _ => {
                    let line = current.trim();
                    if !line.is_empty() {
                        paragraphs.push(line.to_string());
                    }
                    current.clear();
                }
            },
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        paragraphs.push(tail.to_string());
    }
    paragraphs.join("\n")
}

fn unescape(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") => u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::layout::template::{profile_for, StyleName};
    use crate::layout::{render_document, OutputFormat};

    fn package(document_xml: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .expect("start part");
        zip.write_all(document_xml.as_bytes()).expect("write part");
        zip.finish().expect("finish zip").into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Doe</w:t></w:r></w:p>
            <w:p></w:p>
            <w:p><w:r><w:t>  </w:t></w:r></w:p>
            <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Rust</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(paragraph_text(xml), "Jane Doe\nSkills\tRust");
    }

    #[test]
    fn test_line_breaks_and_entities() {
        let xml = "<w:p><w:r><w:t>R&amp;D &lt;lead&gt;</w:t><w:br/><w:t>caf&#233; &#x2013; ok</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "R&D <lead>\ncafé – ok");
    }

    #[test]
    fn test_tab_element_is_not_a_text_run() {
        let xml = "<w:p><w:r><w:t>a</w:t><w:tab/><w:tbl/><w:t>b</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "a\tb");
    }

    #[test]
    fn test_unknown_entity_is_kept() {
        assert_eq!(unescape("&#xZZ; &amp;"), "&#xZZ; &");
        assert_eq!(unescape("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn test_extract_from_package() {
        let bytes = package("<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>");
        assert_eq!(extract(&bytes).expect("extracts"), "Jane Doe");
    }

    #[test]
    fn test_missing_document_part() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", SimpleFileOptions::default())
            .expect("start part");
        let bytes = zip.finish().expect("finish").into_inner();
        assert!(matches!(extract(&bytes), Err(ExtractError::Docx(_))));
    }

    #[test]
    fn test_reads_back_rendered_docx() {
        let text = "Jane Doe\njane@x.io | 555\n\nEXPERIENCE\n- Built R&D tooling";
        let doc = render_document(
            text,
            &profile_for(StyleName::AtsClassic),
            "TAILORED RESUME",
            OutputFormat::Docx,
        )
        .expect("renders");
        let extracted = extract(&doc.bytes).expect("extracts");
        assert_eq!(
            extracted,
            "Jane Doe\njane@x.io | 555\nEXPERIENCE\n- Built R&D tooling"
        );
    }
}
