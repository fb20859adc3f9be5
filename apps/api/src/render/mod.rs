// Improved-resume rendering: section → text improvements laid out as a paginated PDF.
// Rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod metrics;
pub mod pdf;

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

pub use pdf::LopdfRenderer;

/// One titled block of the improved resume.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeSection {
    pub name: String,
    pub body: String,
}

/// Body of `POST /generate_improved_resume`.
#[derive(Debug, Deserialize)]
pub struct ImprovedResumeRequest {
    #[serde(default)]
    pub original_text: String,
    /// Kept in the JSON object's key order.
    #[serde(deserialize_with = "ordered_sections")]
    pub improvements: Vec<ResumeSection>,
    #[serde(default)]
    pub formatting_suggestions: String,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError(e.to_string())
    }
}

/// Sections in, document bytes out.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, sections: &[ResumeSection]) -> Result<Vec<u8>, RenderError>;
}

/// Deserializes a `{name: text}` object into sections, preserving key order.
fn ordered_sections<'de, D>(deserializer: D) -> Result<Vec<ResumeSection>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SectionsVisitor;

    impl<'de> Visitor<'de> for SectionsVisitor {
        type Value = Vec<ResumeSection>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of section name to improvement text")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut sections = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, body)) = map.next_entry::<String, String>()? {
                sections.push(ResumeSection { name, body });
            }
            Ok(sections)
        }
    }

    deserializer.deserialize_map(SectionsVisitor)
}
