// Prompt constants for the resume review pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, REVIEWER_PERSONA};
use crate::review::report::SectionFeedback;

/// One scored evaluation category.
#[derive(Debug, Clone, Copy)]
pub struct ScoreCategory {
    /// JSON key in the model's reply.
    pub key: &'static str,
    pub label: &'static str,
    /// Share of the overall score advertised to the model.
    pub weight: f64,
    pub rubric: &'static str,
}

/// Source of truth for the category list, used by both the prompt and the parser.
///
/// `report::overall_score` is a plain mean. That only matches the weights
/// advertised here while they are uniform; `test_weights_are_uniform` pins it.
pub const SCORE_CATEGORIES: [ScoreCategory; 5] = [
    ScoreCategory {
        key: "technical_skills",
        label: "Technical Skills",
        weight: 0.20,
        rubric: "depth and relevance of the tech stack, tools and languages for the role",
    },
    ScoreCategory {
        key: "soft_skills",
        label: "Soft Skills",
        weight: 0.20,
        rubric: "communication, leadership and collaboration shown through concrete situations",
    },
    ScoreCategory {
        key: "formatting",
        label: "Formatting & ATS Compatibility",
        weight: 0.20,
        rubric: "structure, consistency, readability and keyword coverage for ATS parsing",
    },
    ScoreCategory {
        key: "measurable_results",
        label: "Measurable Results",
        weight: 0.20,
        rubric: "quantified impact: metrics, percentages, scale, revenue or time saved",
    },
    ScoreCategory {
        key: "core_values",
        label: "Core Values Alignment",
        weight: 0.20,
        rubric: "evidence of the company's known values and culture in past work",
    },
];

/// System prompt for the review call.
pub fn review_system_prompt() -> String {
    format!("{REVIEWER_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// Review prompt template.
/// Placeholders: `{company}`, `{job_title}`, `{categories}`, `{schema}`,
/// `{bullet_examples}`, `{resume_text}`.
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"As an expert ATS system and hiring manager at top tech companies, analyze this resume for a {job_title} position at {company}. Compare it with successful resumes that have secured interviews and offers for {job_title} roles at {company} and similar companies.

Score each category from 0 to 100. Categories and their weight in the overall score:
{categories}

Return a JSON object with this EXACT schema (no extra fields):
{schema}

Rules:
- Every score is a plain number between 0 and 100. No "%" sign, no text.
- "improvements" and "examples" are arrays of strings, most important first.
- "examples" must be rewritten bullets from THIS resume, not generic advice.
- "real_resume_bullets" holds bullets in the style of successful {company} resumes, grouped by category.

Bullet style guide:
{bullet_examples}

Resume:
{resume_text}"#;

/// Few-shot bad vs good bullets that steer the rewrite style.
pub const BULLET_EXAMPLES: &str = r#"BAD: "Worked on the backend team."
GOOD: "Cut p99 checkout latency 40% (800ms to 480ms) by moving order validation to an async queue serving 2M requests/day."

BAD: "Responsible for testing."
GOOD: "Raised integration test coverage from 35% to 85%, catching 12 release-blocking regressions in the first quarter."

BAD: "Helped mentor new hires."
GOOD: "Mentored 4 new engineers through onboarding; all shipped a production feature within their first 3 weeks."

BAD: "Good communication skills."
GOOD: "Presented quarterly reliability reviews to 60+ engineers and 3 directors, driving adoption of a shared incident runbook.""#;

/// Renders the weighted category list, one line per category.
fn render_categories() -> String {
    SCORE_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} ({:.0}%) [\"{}\"]: {}",
                i + 1,
                c.label,
                c.weight * 100.0,
                c.key,
                c.rubric
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the expected reply schema from `SCORE_CATEGORIES`.
fn render_schema() -> String {
    let scores = SCORE_CATEGORIES
        .iter()
        .map(|c| format!("  \"{}\": 85,", c.key))
        .collect::<Vec<_>>()
        .join("\n");

    let example = serde_json::to_string_pretty(&SectionFeedback::schema_example())
        .unwrap_or_default()
        .replace('\n', "\n    ");
    let feedback = SCORE_CATEGORIES
        .iter()
        .map(|c| format!("    \"{}\": {example}", c.key))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("{{\n{scores}\n  \"section_feedback\": {{\n{feedback}\n  }}\n}}")
}

/// Builds the review prompt for a resume and target role.
///
/// User content is substituted literally in a single pass, so braces or
/// placeholder names inside the resume are never re-expanded.
pub fn build_review_prompt(company: &str, job_title: &str, resume_text: &str) -> String {
    let categories = render_categories();
    let schema = render_schema();
    fill_template(
        REVIEW_PROMPT_TEMPLATE,
        &[
            ("company", company),
            ("job_title", job_title),
            ("categories", categories.as_str()),
            ("schema", schema.as_str()),
            ("bullet_examples", BULLET_EXAMPLES),
            ("resume_text", resume_text),
        ],
    )
}

/// Single-pass `{name}` substitution. Unknown `{...}` sequences are copied through.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let matched = vars.iter().find_map(|(name, value)| {
            tail.strip_prefix(*name)
                .and_then(|t| t.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match matched {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
