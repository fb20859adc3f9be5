// Resume review: upload → extract → prompt → completion → score report.
// All completion calls go through the llm_client::TextCompleter trait.

pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod report;
pub mod upload;
