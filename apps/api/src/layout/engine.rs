//! Layout Engine: turns the classified line stream into positioned, styled runs on
//! a [`Surface`], making every wrap and page-break decision.
//!
//! # Cursor model
//! The cursor starts at the top margin of page 1. Each visual line moves it down by
//! `font_size * 1.2`. Before a line is drawn, if `y - line_height < bottom_margin` the
//! engine starts a new page; that is the only page-break trigger. Gaps between blocks
//! are clamped at the bottom margin, so the cursor never sits below it and the next
//! drawn line breaks the page instead.
//!
//! # Gaps (multiples of the body size)
//! | Role | before | after |
//! |---|---|---|
//! | Name | | 0.5 |
//! | ContactInfo | | 1.0 |
//! | SectionTitle | 0.8 | 0.3 |
//! | JobSubheading (bold) | | 0.2 |
//! | SkillsCategory | | 0.3 |
//! | Bullet | | 0.1 |
//! | Paragraph | | 0.2 |
//! | Blank | 0.5 | |

use tracing::debug;

use crate::layout::classify::{ClassifiedLine, LineRole};
use crate::layout::font_metrics::FontFace;
use crate::layout::surface::{Block, Surface, TextRun};
use crate::layout::template::{Rgb, StyleProfile};
use crate::layout::wrap::{wrap_line, wrap_with_first_width};

pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

const NAME_GAP_AFTER: f32 = 0.5;
const CONTACT_GAP_AFTER: f32 = 1.0;
const SECTION_GAP_BEFORE: f32 = 0.8;
const SECTION_GAP_AFTER: f32 = 0.3;
const SUBHEADING_GAP_AFTER: f32 = 0.2;
const SKILLS_GAP_AFTER: f32 = 0.3;
const BULLET_GAP_AFTER: f32 = 0.1;
const PARAGRAPH_GAP_AFTER: f32 = 0.2;
const BLANK_GAP: f32 = 0.5;

const BULLET_GLYPH: &str = "- ";

/// Vertical position and page index. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
}

#[derive(Debug, Clone, Copy)]
struct RunStyle {
    face: FontFace,
    size: f32,
    color: Rgb,
}

impl RunStyle {
    fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

pub struct LayoutEngine<'p, S: Surface> {
    profile: &'p StyleProfile,
    surface: S,
    cursor: Cursor,
}

impl<'p, S: Surface> LayoutEngine<'p, S> {
    /// Opens page 1 on `surface` and places the cursor at the top margin.
    pub fn new(profile: &'p StyleProfile, mut surface: S) -> Self {
        surface.start_page();
        Self {
            profile,
            surface,
            cursor: Cursor {
                y: profile.top_y(),
                page: 1,
            },
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn layout(&mut self, lines: &[ClassifiedLine]) {
        for line in lines {
            self.layout_line(line);
        }
    }

    pub fn layout_line(&mut self, line: &ClassifiedLine) {
        let p = self.profile;
        let body = p.body_size;
        let plain = RunStyle {
            face: p.body_font,
            size: body,
            color: Rgb::BLACK,
        };

        match &line.role {
            LineRole::Blank => {
                let height = body * BLANK_GAP;
                self.surface.blank(height);
                self.skip(height);
            }
            LineRole::Name => {
                let style = RunStyle {
                    face: p.bold_font,
                    size: p.name_size,
                    color: Rgb::BLACK,
                };
                self.text_block(&line.text, style, 0.0, body * NAME_GAP_AFTER);
            }
            LineRole::ContactInfo => {
                let style = RunStyle {
                    size: p.contact_size,
                    ..plain
                };
                self.text_block(&line.text, style, 0.0, body * CONTACT_GAP_AFTER);
            }
            LineRole::SectionTitle => {
                let before = body * SECTION_GAP_BEFORE;
                self.skip(before);
                let style = RunStyle {
                    face: p.bold_font,
                    size: p.section_size,
                    color: p.accent,
                };
                self.text_block(&line.text, style, before, body * SECTION_GAP_AFTER);
            }
            LineRole::JobSubheading { emphasized: true } => {
                let style = RunStyle {
                    face: p.bold_font,
                    size: p.subheading_size,
                    color: Rgb::BLACK,
                };
                self.text_block(&line.text, style, 0.0, body * SUBHEADING_GAP_AFTER);
            }
            LineRole::JobSubheading { emphasized: false } => {
                self.text_block(&line.text, plain, 0.0, 0.0);
            }
            LineRole::SkillsCategory {
                category_label,
                list_text,
            } => self.skills_block(category_label, list_text),
            LineRole::Bullet { content } => self.bullet_block(content),
            LineRole::Paragraph => {
                self.text_block(&line.text, plain, 0.0, body * PARAGRAPH_GAP_AFTER);
            }
        }
    }

    /// Hands back the surface and the number of pages used.
    pub fn finish(self) -> (S, usize) {
        (self.surface, self.cursor.page)
    }

    // ── blocks ──────────────────────────────────────────────────────────────

    /// Full-width, left-aligned wrapped text.
    fn text_block(&mut self, text: &str, style: RunStyle, space_before: f32, space_after: f32) {
        let lh = style.line_height();
        let lines = self.wrap(text, self.profile.usable_width(), style);
        let x = self.profile.margins.left;

        self.surface.begin_block(&Block {
            space_before,
            space_after,
            line_height: lh,
            ..Block::default()
        });
        for visual in lines {
            self.ensure_room(lh);
            self.draw(x, visual, style);
            self.cursor.y -= lh;
        }
        self.surface.end_block();
        self.skip(space_after);
    }

    /// Glyph at the bullet indent, text hanging after it on every line.
    fn bullet_block(&mut self, content: &str) {
        let p = self.profile;
        let style = RunStyle {
            face: p.body_font,
            size: p.body_size,
            color: Rgb::BLACK,
        };
        let lh = style.line_height();
        let glyph_width = self.surface.measure(BULLET_GLYPH, style.face, style.size);
        let glyph_x = p.margins.left + p.bullet_indent;
        let text_x = glyph_x + glyph_width;
        let width = (p.usable_width() - p.bullet_indent - glyph_width).max(0.0);

        let mut lines = self.wrap(content, width, style);
        if lines.is_empty() {
            lines.push(String::new());
        }

        let space_after = p.body_size * BULLET_GAP_AFTER;
        self.surface.begin_block(&Block {
            indent: p.bullet_indent + glyph_width,
            hanging: glyph_width,
            space_before: 0.0,
            space_after,
            line_height: lh,
        });
        for (i, visual) in lines.into_iter().enumerate() {
            self.ensure_room(lh);
            if i == 0 {
                self.draw(glyph_x, BULLET_GLYPH.to_string(), style);
            }
            if !visual.is_empty() {
                self.draw(text_x, visual, style);
            }
            self.cursor.y -= lh;
        }
        self.surface.end_block();
        self.skip(space_after);
    }

    /// Bold label at the bullet indent; the list follows on the same line when its
    /// first word fits, and wraps under a deeper indent.
    fn skills_block(&mut self, label: &str, list: &str) {
        let p = self.profile;
        let label_style = RunStyle {
            face: p.bold_font,
            size: p.subheading_size,
            color: Rgb::BLACK,
        };
        let list_style = RunStyle {
            face: p.body_font,
            size: p.body_size,
            color: Rgb::BLACK,
        };
        let label_lh = label_style.line_height();
        let list_lh = list_style.line_height();
        let label_x = p.margins.left + p.bullet_indent;
        let continuation_x = p.margins.left + 2.0 * p.bullet_indent;
        let rest_width = (p.usable_width() - 2.0 * p.bullet_indent).max(0.0);

        let mut label_lines = self.wrap(label, p.usable_width() - p.bullet_indent, label_style);
        let last_label = label_lines.pop().unwrap_or_default();

        let label_width = self
            .surface
            .measure(&last_label, label_style.face, label_style.size);
        let space = self.surface.measure(" ", list_style.face, list_style.size);
        let first_width = p.usable_width() - p.bullet_indent - label_width - space;
        let measure = |s: &str| self.surface.measure(s, list_style.face, list_style.size);
        let shares_line = list
            .split_whitespace()
            .next()
            .is_some_and(|word| measure(word) <= first_width);
        let list_lines = if shares_line {
            wrap_with_first_width(list, first_width, rest_width, measure)
        } else {
            wrap_line(list, rest_width, measure)
        };

        let space_after = p.body_size * SKILLS_GAP_AFTER;
        self.surface.begin_block(&Block {
            indent: 2.0 * p.bullet_indent,
            hanging: p.bullet_indent,
            space_before: 0.0,
            space_after,
            line_height: list_lh,
        });

        for visual in label_lines {
            self.ensure_room(label_lh);
            self.draw(label_x, visual, label_style);
            self.cursor.y -= label_lh;
        }

        let mut list_lines = list_lines.into_iter();
        let head_lh = if shares_line {
            label_lh.max(list_lh)
        } else {
            label_lh
        };
        self.ensure_room(head_lh);
        self.draw(label_x, last_label, label_style);
        if shares_line {
            if let Some(first) = list_lines.next() {
                self.draw(label_x + label_width + space, first, list_style);
            }
        }
        self.cursor.y -= head_lh;

        for visual in list_lines {
            self.ensure_room(list_lh);
            self.draw(continuation_x, visual, list_style);
            self.cursor.y -= list_lh;
        }

        self.surface.end_block();
        self.skip(space_after);
    }

    // ── cursor ──────────────────────────────────────────────────────────────

    fn wrap(&self, text: &str, width: f32, style: RunStyle) -> Vec<String> {
        wrap_line(text, width, |s| {
            self.surface.measure(s, style.face, style.size)
        })
    }

    fn draw(&mut self, x: f32, text: String, style: RunStyle) {
        self.surface.draw_run(&TextRun {
            x,
            y: self.cursor.y,
            text,
            face: style.face,
            size: style.size,
            color: style.color,
        });
    }

    /// Breaks the page when a line of `line_height` would cross the bottom margin.
    fn ensure_room(&mut self, line_height: f32) {
        if self.cursor.y - line_height < self.profile.bottom_y() {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.surface.start_page();
        self.cursor.y = self.profile.top_y();
        self.cursor.page += 1;
        debug!(page = self.cursor.page, "Page break");
    }

    fn skip(&mut self, gap: f32) {
        self.cursor.y = (self.cursor.y - gap).max(self.profile.bottom_y());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
