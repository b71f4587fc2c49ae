//! The drawing surface the layout engine renders onto.
//!
//! The engine owns every positioning decision (wrap points, gaps, page breaks) and
//! reports them through this trait. A fixed-layout surface places each run where it
//! is told; a flow surface groups a block's runs into one paragraph and keeps only
//! the styling and spacing.

use crate::layout::font_metrics::FontFace;
use crate::layout::template::Rgb;

/// One styled piece of text on one visual line. Coordinates are PDF user space:
/// points from the bottom-left corner, `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
}

/// Paragraph-level properties for the runs between `begin_block` and `end_block`.
///
/// `indent` is where wrapped continuation lines start, measured from the left
/// margin. The first line starts `hanging` points to the left of it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Block {
    pub indent: f32,
    pub hanging: f32,
    pub space_before: f32,
    pub space_after: f32,
    /// Line height the engine advances by for this block.
    pub line_height: f32,
}

pub trait Surface {
    /// Rendered width of `text` in points.
    fn measure(&self, text: &str, face: FontFace, size: f32) -> f32 {
        face.measure(text, size)
    }

    /// Opens a new page. Called once before any drawing and again on every page break.
    fn start_page(&mut self);

    fn begin_block(&mut self, block: &Block);

    fn draw_run(&mut self, run: &TextRun);

    fn end_block(&mut self);

    /// Vertical whitespace with no content.
    fn blank(&mut self, height: f32);
}
