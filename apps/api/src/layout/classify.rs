//! Line Classifier: assigns a structural role to every line of a normalized resume.
//!
//! Classification is a left fold: each step takes the line plus the running
//! [`ClassificationContext`] and returns the classified line together with the next
//! context. Nothing else carries state between lines.
//!
//! # Rule precedence (first match wins)
//! 1. Blank
//! 2. Name (first non-blank line only)
//! 3. ContactInfo (contains `|` and `@`)
//! 4. SectionTitle (ALL CAPS, `[A-Z0-9 &/,-]`, at most 40 chars)
//! 5. JobSubheading (right after a section title, or short + 4 digits + not a bullet)
//! 6. SkillsCategory (bullet with a colon inside the technical skills section)
//! 7. Bullet
//! 8. Paragraph
//!
//! Rule 5 also fires on short sentences that happen to contain a four-digit number
//! ("Cut costs by 2000 USD"). That false-positive surface is kept as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SECTION_TITLE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9 &/,-]+$").expect("section title regex"));

static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("year regex"));

/// "March 2021 - " at line start.
static MONTH_YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+ \d{4} - ").expect("month-year regex"));

const SECTION_TITLE_MAX_CHARS: usize = 40;
const SUBHEADING_MAX_CHARS: usize = 50;
const SKILLS_SECTION_MARKER: &str = "TECHNICAL SKILLS";
const BULLET_GLYPHS: [char; 3] = ['-', '•', '*'];

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// The structural role of one line, with the fields derived for that role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum LineRole {
    Name,
    ContactInfo,
    SectionTitle,
    /// Company / role / date line. `emphasized` lines render bold.
    JobSubheading { emphasized: bool },
    /// `"- Languages: Rust, Go"` inside the technical skills section.
    SkillsCategory {
        category_label: String,
        list_text: String,
    },
    Bullet { content: String },
    Blank,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine {
    /// The line exactly as it appeared in the input.
    pub raw_text: String,
    /// Trimmed text with any bullet prefix canonicalised to `"- "`.
    pub text: String,
    #[serde(flatten)]
    pub role: LineRole,
}

/// Running state threaded through one document's classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationContext {
    pub is_first_line: bool,
    pub prev_was_section_title: bool,
    pub in_skills_section: bool,
}

impl Default for ClassificationContext {
    fn default() -> Self {
        Self {
            is_first_line: true,
            prev_was_section_title: false,
            in_skills_section: false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Classifies every line of `text`, in order.
pub fn classify_document(text: &str) -> Vec<ClassifiedLine> {
    classify_lines(text.lines())
}

pub fn classify_lines<'a, I>(lines: I) -> Vec<ClassifiedLine>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ctx = ClassificationContext::default();
    let mut out = Vec::new();
    for raw in lines {
        let (line, next) = classify_line(raw, ctx);
        out.push(line);
        ctx = next;
    }
    out
}

/// One fold step: classifies `raw` under `ctx` and returns the updated context.
pub fn classify_line(
    raw: &str,
    ctx: ClassificationContext,
) -> (ClassifiedLine, ClassificationContext) {
    let line = raw.trim_end();

    if line.trim().is_empty() {
        return (classified(raw, String::new(), LineRole::Blank), ctx);
    }

    let line = if is_bullet(line) {
        format!("- {}", strip_bullet_prefix(line))
    } else {
        line.to_string()
    };
    let text = line.trim().to_string();
    let mut next = ctx;

    if ctx.is_first_line {
        next.is_first_line = false;
        return (classified(raw, text, LineRole::Name), next);
    }

    if line.contains('|') && line.contains('@') {
        return (classified(raw, text, LineRole::ContactInfo), next);
    }

    if is_section_title(&line) {
        next.in_skills_section = line.to_uppercase().contains(SKILLS_SECTION_MARKER);
        next.prev_was_section_title = true;
        return (classified(raw, text, LineRole::SectionTitle), next);
    }

    if ctx.prev_was_section_title || looks_like_dated_heading(&line) {
        let emphasized = line.contains(" - ") || MONTH_YEAR_RANGE.is_match(&line);
        next.prev_was_section_title = false;
        return (
            classified(raw, text, LineRole::JobSubheading { emphasized }),
            next,
        );
    }

    if ctx.in_skills_section && is_bullet(&line) {
        if let Some((left, right)) = line.split_once(':') {
            let category_label = format!("{}:", left.trim_start_matches(['-', ' ']).trim());
            let list_text = right.trim().to_string();
            return (
                classified(
                    raw,
                    text,
                    LineRole::SkillsCategory {
                        category_label,
                        list_text,
                    },
                ),
                next,
            );
        }
    }

    next.prev_was_section_title = false;

    if is_bullet(&line) {
        let content = line.trim_start_matches(['-', ' ']).trim().to_string();
        return (classified(raw, text, LineRole::Bullet { content }), next);
    }

    (classified(raw, text, LineRole::Paragraph), next)
}

fn classified(raw: &str, text: String, role: LineRole) -> ClassifiedLine {
    ClassifiedLine {
        raw_text: raw.to_string(),
        text,
        role,
    }
}

fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET_GLYPHS)
}

fn strip_bullet_prefix(line: &str) -> &str {
    line.trim_start_matches(['•', '*', '-', ' ']).trim()
}

fn is_section_title(line: &str) -> bool {
    let s = line.trim();
    !s.is_empty()
        && s.to_uppercase() == s
        && s.chars().count() <= SECTION_TITLE_MAX_CHARS
        && SECTION_TITLE_CHARS.is_match(s)
}

fn looks_like_dated_heading(line: &str) -> bool {
    line.trim().chars().count() < SUBHEADING_MAX_CHARS
        && !is_bullet(line)
        && FOUR_DIGITS.is_match(line)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roles(text: &str) -> Vec<LineRole> {
        classify_document(text).into_iter().map(|l| l.role).collect()
    }

    fn mid_document() -> ClassificationContext {
        ClassificationContext {
            is_first_line: false,
            ..ClassificationContext::default()
        }
    }

    #[test]
    fn test_empty_document_has_no_lines() {
        assert!(classify_document("").is_empty());
    }

    #[test]
    fn test_first_line_is_name_even_if_it_looks_like_a_title() {
        let lines = classify_document("JANE DOE\nENGINEER");
        assert_eq!(lines[0].role, LineRole::Name);
        assert_eq!(lines[1].role, LineRole::SectionTitle);
    }

    #[test]
    fn test_blank_line_does_not_consume_first_line_flag() {
        let (line, ctx) = classify_line("   ", ClassificationContext::default());
        assert_eq!(line.role, LineRole::Blank);
        assert!(ctx.is_first_line);
    }

    #[test]
    fn test_contact_requires_pipe_and_at() {
        let r = roles("Jane\njane@x.io | 555-0100\nBerlin | Remote\njane@x.io");
        assert_eq!(r[1], LineRole::ContactInfo);
        assert_eq!(r[2], LineRole::Paragraph);
        assert_eq!(r[3], LineRole::Paragraph);
    }

    #[test]
    fn test_section_title_then_year_line_is_subheading() {
        let ctx = mid_document();
        let (title, ctx) = classify_line("PROJECTS", ctx);
        assert_eq!(title.role, LineRole::SectionTitle);
        assert!(ctx.prev_was_section_title);

        let (sub, ctx) = classify_line("Inventory System   2023", ctx);
        assert_eq!(sub.role, LineRole::JobSubheading { emphasized: false });
        assert!(!ctx.prev_was_section_title);
    }

    #[test]
    fn test_line_after_section_title_is_subheading_without_year() {
        let r = roles("Jane\nEXPERIENCE\nAcme Corp, Berlin\nBuilt things for customers");
        assert_eq!(r[2], LineRole::JobSubheading { emphasized: false });
        assert_eq!(r[3], LineRole::Paragraph);
    }

    #[test]
    fn test_section_title_rules() {
        assert!(is_section_title("TECHNICAL SKILLS"));
        assert!(is_section_title("  R&D / TOOLS, MISC-2  "));
        assert!(!is_section_title("Experience"));
        assert!(!is_section_title("SKILLS:"));
        assert!(!is_section_title(&"A".repeat(41)));
        assert!(is_section_title(&"A".repeat(40)));
    }

    #[test]
    fn test_skills_section_flag_follows_titles() {
        let ctx = mid_document();
        let (_, ctx) = classify_line("TECHNICAL SKILLS", ctx);
        assert!(ctx.in_skills_section);
        let (_, ctx) = classify_line("EDUCATION", ctx);
        assert!(!ctx.in_skills_section);
    }

    #[test]
    fn test_skills_category_split() {
        let ctx = ClassificationContext {
            is_first_line: false,
            prev_was_section_title: false,
            in_skills_section: true,
        };
        let (line, _) = classify_line("- Languages: Python, Go, Rust", ctx);
        assert_eq!(
            line.role,
            LineRole::SkillsCategory {
                category_label: "Languages:".to_string(),
                list_text: "Python, Go, Rust".to_string(),
            }
        );
    }

    #[test]
    fn test_skills_category_splits_on_first_colon_only() {
        let ctx = ClassificationContext {
            is_first_line: false,
            prev_was_section_title: false,
            in_skills_section: true,
        };
        let (line, _) = classify_line("• Cloud: AWS: EC2, S3", ctx);
        assert_eq!(
            line.role,
            LineRole::SkillsCategory {
                category_label: "Cloud:".to_string(),
                list_text: "AWS: EC2, S3".to_string(),
            }
        );
        assert_eq!(line.text, "- Cloud: AWS: EC2, S3");
    }

    #[test]
    fn test_colon_bullet_outside_skills_is_plain_bullet() {
        let (line, _) = classify_line("- Languages: Python", mid_document());
        assert_eq!(
            line.role,
            LineRole::Bullet {
                content: "Languages: Python".to_string()
            }
        );
    }

    #[test]
    fn test_first_skills_bullet_right_after_title_is_subheading() {
        // prev_was_section_title outranks the skills rule.
        let r = roles("Jane\nTECHNICAL SKILLS\n- Languages: Rust\n- Cloud: AWS");
        assert_eq!(r[2], LineRole::JobSubheading { emphasized: false });
        assert!(matches!(r[3], LineRole::SkillsCategory { .. }));
    }

    #[test]
    fn test_emphasis_on_dash_separated_or_month_year() {
        let ctx = mid_document();
        let (a, _) = classify_line("Acme Corp - Senior Engineer 2021", ctx);
        assert_eq!(a.role, LineRole::JobSubheading { emphasized: true });
        let (b, _) = classify_line("March 2021 - Present", ctx);
        assert_eq!(b.role, LineRole::JobSubheading { emphasized: true });
        let (c, _) = classify_line("Acme Corp 2019-2021", ctx);
        assert_eq!(c.role, LineRole::JobSubheading { emphasized: false });
    }

    #[test]
    fn test_short_sentence_with_number_is_subheading() {
        // Accepted heuristic false positive.
        let (line, _) = classify_line("Saved 1500 hours of manual work", mid_document());
        assert_eq!(line.role, LineRole::JobSubheading { emphasized: false });
    }

    #[test]
    fn test_long_line_with_year_is_paragraph() {
        let line_text = "Delivered a migration of the billing platform to Rust in 2022 ahead of plan";
        let (line, _) = classify_line(line_text, mid_document());
        assert_eq!(line.role, LineRole::Paragraph);
    }

    #[test]
    fn test_bullet_with_year_is_bullet() {
        let (line, _) = classify_line("- Shipped v2 in 2023", mid_document());
        assert_eq!(
            line.role,
            LineRole::Bullet {
                content: "Shipped v2 in 2023".to_string()
            }
        );
    }

    #[test]
    fn test_bullet_glyphs_are_canonicalised() {
        let (line, _) = classify_line("  •  Led a team of four", mid_document());
        assert_eq!(line.text, "- Led a team of four");
        assert_eq!(
            line.role,
            LineRole::Bullet {
                content: "Led a team of four".to_string()
            }
        );
    }

    #[test]
    fn test_blank_keeps_prev_section_flag() {
        let r = roles("Jane\nEXPERIENCE\n\nAcme Corp\n- did work");
        assert_eq!(r[2], LineRole::Blank);
        assert_eq!(r[3], LineRole::JobSubheading { emphasized: false });
        assert!(matches!(r[4], LineRole::Bullet { .. }));
    }

    #[test]
    fn test_contact_keeps_prev_section_flag() {
        let ctx = ClassificationContext {
            is_first_line: false,
            prev_was_section_title: true,
            in_skills_section: false,
        };
        let (line, next) = classify_line("a@b.c | 555", ctx);
        assert_eq!(line.role, LineRole::ContactInfo);
        assert!(next.prev_was_section_title);
    }

    #[test]
    fn test_paragraph_resets_prev_section_flag() {
        let ctx = ClassificationContext {
            is_first_line: false,
            prev_was_section_title: true,
            in_skills_section: false,
        };
        let (_, next) = classify_line("anything at all", ctx);
        assert!(!next.prev_was_section_title);
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let lines = classify_document("Jane Doe  \n*   Did things");
        assert_eq!(lines[0].raw_text, "Jane Doe  ");
        assert_eq!(lines[0].text, "Jane Doe");
        assert_eq!(lines[1].raw_text, "*   Did things");
    }

    #[test]
    fn test_full_resume_role_sequence() {
        let resume = "\
Jane Doe
jane@example.com | +1 555 0100 | Berlin

SUMMARY
Backend engineer focused on reliable distributed systems and developer tooling.

EXPERIENCE
Acme Corp - Senior Engineer
- Built a Rust ingestion pipeline handling 40k events per second
- Cut cloud spend by 30 percent

TECHNICAL SKILLS
Languages and tools
- Languages: Rust, Go, Python
- Cloud: AWS, GCP";
        let r = roles(resume);
        assert_eq!(r[0], LineRole::Name);
        assert_eq!(r[1], LineRole::ContactInfo);
        assert_eq!(r[2], LineRole::Blank);
        assert_eq!(r[3], LineRole::SectionTitle);
        assert_eq!(r[4], LineRole::JobSubheading { emphasized: false });
        assert_eq!(r[5], LineRole::Blank);
        assert_eq!(r[6], LineRole::SectionTitle);
        assert_eq!(r[7], LineRole::JobSubheading { emphasized: true });
        assert!(matches!(r[8], LineRole::Bullet { .. }));
        assert!(matches!(r[9], LineRole::Bullet { .. }));
        assert_eq!(r[11], LineRole::SectionTitle);
        assert_eq!(r[12], LineRole::JobSubheading { emphasized: false });
        assert!(matches!(r[13], LineRole::SkillsCategory { .. }));
        assert!(matches!(r[14], LineRole::SkillsCategory { .. }));
    }

    #[test]
    fn test_serializes_role_tag() {
        let lines = classify_document("Jane\n- Rust");
        let json = serde_json::to_value(&lines).expect("serializable");
        assert_eq!(json[0]["role"], "name");
        assert_eq!(json[1]["role"], "bullet");
        assert_eq!(json[1]["content"], "Rust");
    }

    proptest! {
        #[test]
        fn prop_one_classified_line_per_input_line(s in r"(?s).{0,200}") {
            let lines = classify_document(&s);
            prop_assert_eq!(lines.len(), s.lines().count());
        }

        #[test]
        fn prop_classification_is_deterministic(s in r"(?s).{0,200}") {
            prop_assert_eq!(classify_document(&s), classify_document(&s));
        }
    }
}
