// Prompt text for the resume rewrite call.

/// System prompt for the rewrite. Plain text out, no commentary.
pub const REWRITE_SYSTEM: &str = "You are a careful resume editor. \
    You rewrite resumes to match a job description without inventing anything. \
    Respond with the rewritten resume only, as plain text. \
    Do NOT use markdown, code fences, tables or explanations.";

/// Builds the rewrite prompt for one resume / job description pair.
pub fn build_rewrite_prompt(resume_text: &str, jd_text: &str) -> String {
    format!(
        r#"You are a resume enhancer.

STRICT RULES:
- Do NOT add fake experience
- Do NOT add new companies, tools, skills, certifications
- Do NOT change dates, titles, locations
- Output must be PLAIN TEXT ONLY (no markdown, no **, no ##, no tables)

FORMATTING RULES:
- First line: the candidate's name
- Second line: contact details separated by " | "
- Use ALL CAPS for section titles (SUMMARY, EXPERIENCE, EDUCATION, TECHNICAL SKILLS, CERTIFICATIONS)
- Use hyphen (-) for bullets
- In TECHNICAL SKILLS, write one bullet per category as "- Category: item, item, item"
- One blank line between sections

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}

TASK:
Rewrite the resume to better align to the job description while staying truthful."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_texts() {
        let prompt = build_rewrite_prompt("Jane Doe\n- Rust", "Senior Rust engineer");
        assert!(prompt.contains("RESUME:\nJane Doe\n- Rust\n"));
        assert!(prompt.contains("JOB DESCRIPTION:\nSenior Rust engineer\n"));
    }

    #[test]
    fn test_placeholder_like_input_is_not_substituted_twice() {
        let prompt = build_rewrite_prompt("uses {jd_text} literally", "JD");
        assert!(prompt.contains("uses {jd_text} literally"));
    }

    #[test]
    fn test_prompt_keeps_truthfulness_rules() {
        let prompt = build_rewrite_prompt("", "");
        assert!(prompt.contains("Do NOT add fake experience"));
        assert!(prompt.contains("Do NOT change dates, titles, locations"));
    }
}
