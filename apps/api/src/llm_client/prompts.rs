// Shared prompt fragments. Feature prompts live next to the feature
// (see review/prompts.rs) and compose these.

/// Persona shared by every review call.
pub const REVIEWER_PERSONA: &str = "You are an expert resume reviewer for top tech companies. \
    Provide clear, actionable feedback to help candidates improve their resumes.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
