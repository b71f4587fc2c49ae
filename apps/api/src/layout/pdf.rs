//! Fixed-layout output: every run becomes a positioned text-showing operation in a
//! PDF content stream. Fonts are the non-embedded base-14 faces in WinAnsiEncoding,
//! which is what the width tables in `font_metrics` describe.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::layout::font_metrics::FontFace;
use crate::layout::surface::{Block, Surface, TextRun};
use crate::layout::template::StyleProfile;
use crate::layout::RenderError;

const FACES: [FontFace; 4] = [
    FontFace::Helvetica,
    FontFace::HelveticaBold,
    FontFace::TimesRoman,
    FontFace::TimesBold,
];

pub struct PdfSurface {
    page_width: f32,
    page_height: f32,
    pages: Vec<Vec<Operation>>,
}

impl PdfSurface {
    pub fn new(profile: &StyleProfile) -> Self {
        Self {
            page_width: profile.page_width,
            page_height: profile.page_height,
            pages: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assembles the page tree and serializes the document.
    pub fn into_bytes(self, title: &str) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in FACES {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_key(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.0_f32.into(),
                    0.0_f32.into(),
                    self.page_width.into(),
                    self.page_height.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "Producer" => Object::string_literal("tailor"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(bytes)
    }

    fn current_page(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl Surface for PdfSurface {
    fn start_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn begin_block(&mut self, _block: &Block) {}

    fn draw_run(&mut self, run: &TextRun) {
        let [r, g, b] = run.color.unit();
        let ops = self.current_page();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new(
            "Tf",
            vec![run.face.resource_key().into(), run.size.into()],
        ));
        ops.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&run.text),
                StringFormat::Literal,
            )],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn end_block(&mut self) {}

    fn blank(&mut self, _height: f32) {}
}

/// Encodes text for a WinAnsiEncoding simple font. Latin-1 passes through, the
/// typographic punctuation in the 0x80..0x9F block is mapped, and anything else
/// becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engine::LayoutEngine;
    use crate::layout::classify::classify_document;
    use crate::layout::template::{profile_for, Rgb, StyleName};

    fn render(text: &str) -> (Vec<u8>, usize) {
        let profile = profile_for(StyleName::AtsBlue);
        let mut engine = LayoutEngine::new(&profile, PdfSurface::new(&profile));
        engine.layout(&classify_document(text));
        let (surface, pages) = engine.finish();
        assert_eq!(surface.page_count(), pages, "engine and surface agree on pages");
        (surface.into_bytes("TAILORED RESUME").expect("pdf encodes"), pages)
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_single_page_document_loads() {
        let (bytes, pages) = render("Jane Doe\njane@x.io | 555\n\nEXPERIENCE\nAcme - Engineer");
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).expect("valid pdf");
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_text_and_fonts_are_written() {
        let (bytes, _) = render("Jane Doe\nEXPERIENCE");
        assert!(contains(&bytes, b"(Jane Doe) Tj"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(contains(&bytes, b"TAILORED RESUME"));
    }

    #[test]
    fn test_multi_page_document_loads() {
        let mut text = String::from("Jane Doe\n");
        for i in 0..150 {
            text.push_str(&format!("- Improved service number {i} reliability\n"));
        }
        let (bytes, pages) = render(&text);
        assert!(pages > 1);
        let doc = Document::load_mem(&bytes).expect("valid pdf");
        assert_eq!(doc.get_pages().len(), pages);
    }

    #[test]
    fn test_accent_colour_operator() {
        let profile = profile_for(StyleName::AtsBlue);
        let mut surface = PdfSurface::new(&profile);
        surface.start_page();
        surface.draw_run(&TextRun {
            x: 54.0,
            y: 700.0,
            text: "EXPERIENCE".to_string(),
            face: FontFace::HelveticaBold,
            size: 12.0,
            color: Rgb::ACCENT_BLUE,
        });
        let ops = &surface.pages[0];
        let rg = ops.iter().find(|op| op.operator == "rg").expect("colour set");
        assert_eq!(rg.operands.len(), 3);
        let tf = ops.iter().find(|op| op.operator == "Tf").expect("font set");
        assert!(matches!(&tf.operands[0], Object::Name(n) if n.as_slice() == b"HeBo"));
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Hi"), b"Hi".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("– ’ •"), vec![0x96, b' ', 0x92, b' ', 0x95]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
