//! Turns the model's raw completion into a `ScoreReport`.
//!
//! Scores are coerced, never rejected: a score the model mangles becomes 0.0.
//! A score key the model leaves out is a format error, as is a missing
//! `section_feedback`. Its content is passed through as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::review::prompts::SCORE_CATEGORIES;

/// Scores plus the model's per-category critique, returned by `POST /upload_resume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub technical_skills: f64,
    pub soft_skills: f64,
    pub formatting: f64,
    pub measurable_results: f64,
    pub core_values: f64,
    pub overall_score: f64,
    pub section_feedback: Value,
}

/// Expected shape of one `section_feedback` entry.
///
/// Documents the contract the prompt asks for; the parser does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub key_issues: String,
    pub improvements: Vec<String>,
    pub examples: Vec<String>,
    pub best_practices: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_resume_bullets: Option<Vec<ResumeBulletGroup>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeBulletGroup {
    pub category: String,
    pub bullets: Vec<String>,
}

impl SectionFeedback {
    /// Placeholder entry rendered into the prompt's schema.
    pub fn schema_example() -> Self {
        Self {
            key_issues: "The most important problems in this category".to_string(),
            improvements: vec![
                "Specific change 1".to_string(),
                "Specific change 2".to_string(),
            ],
            examples: vec!["Rewritten bullet from this resume".to_string()],
            best_practices: "What top candidates do in this category".to_string(),
            real_resume_bullets: Some(vec![ResumeBulletGroup {
                category: "Backend".to_string(),
                bullets: vec!["Bullet from a successful resume".to_string()],
            }]),
        }
    }
}

/// Coerces a model-supplied score to a number. Never fails.
///
/// Numbers pass through. Strings keep only ASCII digits and `.` and are
/// parsed (`"72%"` -> 72.0). Anything else, or an unparseable remainder, is 0.0.
pub fn coerce_score(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Unweighted arithmetic mean. See `SCORE_CATEGORIES` for why this is not weighted.
pub fn overall_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Parses the completion text into a `ScoreReport`.
///
/// No repair is attempted: anything that is not a JSON object carrying all five
/// score keys and `section_feedback` is an `UpstreamFormat` error holding the raw text.
pub fn parse_completion(raw: &str) -> Result<ScoreReport, AppError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|_| AppError::UpstreamFormat(raw.to_string()))?;

    let obj = parsed
        .as_object()
        .ok_or_else(|| AppError::UpstreamFormat(raw.to_string()))?;

    let section_feedback = obj
        .get("section_feedback")
        .cloned()
        .ok_or_else(|| AppError::UpstreamFormat(raw.to_string()))?;

    let mut scores = [0.0; SCORE_CATEGORIES.len()];
    for (score, category) in scores.iter_mut().zip(SCORE_CATEGORIES.iter()) {
        let value = obj
            .get(category.key)
            .ok_or_else(|| AppError::UpstreamFormat(raw.to_string()))?;
        *score = coerce_score(value);
    }
    let [technical_skills, soft_skills, formatting, measurable_results, core_values] = scores;

    Ok(ScoreReport {
        technical_skills,
        soft_skills,
        formatting,
        measurable_results,
        core_values,
        overall_score: overall_score(&scores),
        section_feedback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_numeric_string() {
        assert_eq!(coerce_score(&json!("85")), 85.0);
    }

    #[test]
    fn test_coerce_not_applicable_is_zero() {
        assert_eq!(coerce_score(&json!("N/A")), 0.0);
    }

    #[test]
    fn test_coerce_float_passes_through() {
        assert_eq!(coerce_score(&json!(92.5)), 92.5);
    }

    #[test]
    fn test_coerce_strips_percent() {
        assert_eq!(coerce_score(&json!("72%")), 72.0);
    }

    #[test]
    fn test_coerce_keeps_decimal_point() {
        assert_eq!(coerce_score(&json!("Score: 88.5/")), 88.5);
    }

    #[test]
    fn test_coerce_garbage_is_zero() {
        assert_eq!(coerce_score(&json!("1.2.3")), 0.0);
        assert_eq!(coerce_score(&json!("")), 0.0);
        assert_eq!(coerce_score(&Value::Null), 0.0);
        assert_eq!(coerce_score(&json!([90])), 0.0);
        assert_eq!(coerce_score(&json!({"score": 90})), 0.0);
        assert_eq!(coerce_score(&json!(true)), 0.0);
    }

    #[test]
    fn test_overall_is_unweighted_mean() {
        assert_eq!(overall_score(&[80.0, 70.0, 90.0, 60.0, 100.0]), 80.0);
    }

    #[test]
    fn test_overall_empty_is_zero() {
        assert_eq!(overall_score(&[]), 0.0);
    }

    #[test]
    fn test_parse_well_formed_completion() {
        let raw = json!({
            "technical_skills": 80,
            "soft_skills": "70",
            "formatting": 90.0,
            "measurable_results": "60%",
            "core_values": 100,
            "section_feedback": {
                "technical_skills": {
                    "key_issues": "No cloud experience listed",
                    "improvements": ["Add AWS projects"],
                    "examples": ["Deployed 3 services to ECS"],
                    "best_practices": "Lead with the stack the JD names"
                }
            }
        })
        .to_string();

        let report = parse_completion(&raw).unwrap();
        assert_eq!(report.technical_skills, 80.0);
        assert_eq!(report.soft_skills, 70.0);
        assert_eq!(report.formatting, 90.0);
        assert_eq!(report.measurable_results, 60.0);
        assert_eq!(report.core_values, 100.0);
        assert_eq!(report.overall_score, 80.0);
        assert_eq!(
            report.section_feedback["technical_skills"]["improvements"][0],
            "Add AWS projects"
        );
    }

    #[test]
    fn test_section_feedback_passes_through_unchanged() {
        // Off-schema content is not normalized.
        let feedback = json!({"formatting": {"key_issues": 42, "extra": [1, 2]}});
        let raw = json!({
            "technical_skills": 50,
            "soft_skills": 50,
            "formatting": 50,
            "measurable_results": 50,
            "core_values": 50,
            "section_feedback": feedback
        })
        .to_string();
        let report = parse_completion(&raw).unwrap();
        assert_eq!(report.section_feedback, feedback);
    }

    #[test]
    fn test_missing_score_key_is_upstream_format() {
        let raw = r#"{"technical_skills": 100, "section_feedback": {}}"#;
        match parse_completion(raw) {
            Err(AppError::UpstreamFormat(text)) => assert_eq!(text, raw),
            other => panic!("expected UpstreamFormat, got {other:?}"),
        }
        assert!(matches!(
            parse_completion(r#"{"section_feedback": {}}"#),
            Err(AppError::UpstreamFormat(_))
        ));
    }

    #[test]
    fn test_present_but_mangled_scores_coerce_to_zero() {
        let raw = r#"{"technical_skills": 100, "soft_skills": null, "formatting": "N/A",
                      "measurable_results": [], "core_values": "", "section_feedback": {}}"#;
        let report = parse_completion(raw).unwrap();
        assert_eq!(report.soft_skills, 0.0);
        assert_eq!(report.formatting, 0.0);
        assert_eq!(report.overall_score, 20.0);
    }

    #[test]
    fn test_truncated_json_is_upstream_format() {
        let raw = r#"{"technical_skills": 80, "soft_skills": 7"#;
        match parse_completion(raw) {
            Err(AppError::UpstreamFormat(text)) => assert_eq!(text, raw),
            other => panic!("expected UpstreamFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_prose_reply_is_upstream_format() {
        let raw = "Here is my analysis of the resume...";
        assert!(matches!(
            parse_completion(raw),
            Err(AppError::UpstreamFormat(_))
        ));
    }

    #[test]
    fn test_non_object_is_upstream_format() {
        assert!(matches!(
            parse_completion("[1, 2, 3]"),
            Err(AppError::UpstreamFormat(_))
        ));
    }

    #[test]
    fn test_missing_section_feedback_is_upstream_format() {
        let raw = r#"{"technical_skills": 80, "soft_skills": 70}"#;
        assert!(matches!(
            parse_completion(raw),
            Err(AppError::UpstreamFormat(_))
        ));
    }

    #[test]
    fn test_section_feedback_shape_deserializes() {
        let v = json!({
            "key_issues": "Bullets lack numbers",
            "improvements": ["Quantify impact", "Trim to one page"],
            "examples": ["Cut build time 30%"],
            "best_practices": "One metric per bullet",
            "real_resume_bullets": [{"category": "Infra", "bullets": ["Ran 400-node fleet"]}]
        });
        let fb: SectionFeedback = serde_json::from_value(v).unwrap();
        assert_eq!(fb.improvements.len(), 2);
        assert_eq!(fb.real_resume_bullets.unwrap()[0].category, "Infra");
    }

    #[test]
    fn test_real_resume_bullets_optional() {
        let v = json!({
            "key_issues": "",
            "improvements": [],
            "examples": [],
            "best_practices": ""
        });
        let fb: SectionFeedback = serde_json::from_value(v).unwrap();
        assert!(fb.real_resume_bullets.is_none());
        let back = serde_json::to_value(&fb).unwrap();
        assert!(back.get("real_resume_bullets").is_none());
    }

    #[test]
    fn test_report_serializes_flat_contract() {
        let report = parse_completion(
            r#"{"technical_skills":80,"soft_skills":70,"formatting":90,
                "measurable_results":60,"core_values":100,"section_feedback":{}}"#,
        )
        .unwrap();
        let v = serde_json::to_value(&report).unwrap();
        for key in [
            "technical_skills",
            "soft_skills",
            "formatting",
            "measurable_results",
            "core_values",
            "overall_score",
            "section_feedback",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }
}
