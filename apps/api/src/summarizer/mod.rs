//! Summarizer: short natural-language summaries of free text.
//!
//! Never fails: a missing backend, blank input or a backend error each map to
//! a fixed fallback sentence.

use std::sync::Arc;

use tracing::warn;

use crate::llm_client::prompts::{readme_summary_prompt, SUMMARY_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::models::project::ProjectRecord;

pub const MAX_INPUT_CHARS: usize = 1024;

pub const UNAVAILABLE: &str = "Summary generation is currently unavailable.";
pub const NOT_ENOUGH_CONTENT: &str = "Not enough content available to generate a summary.";
pub const GENERATION_FAILED: &str = "Could not generate a summary for the provided text.";
pub const NO_README: &str = "This project has no README content to summarize.";

/// True when `reply` is one of the fixed fallback sentences rather than model output.
pub fn is_fallback(reply: &str) -> bool {
    [UNAVAILABLE, NOT_ENOUGH_CONTENT, GENERATION_FAILED, NO_README].contains(&reply.trim())
}

#[derive(Clone, Default)]
pub struct Summarizer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Summarizer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn summarize(&self, text: &str) -> String {
        let Some(generator) = &self.generator else {
            return UNAVAILABLE.to_string();
        };
        let text = truncate_chars(text, MAX_INPUT_CHARS);
        if text.trim().is_empty() {
            return NOT_ENOUGH_CONTENT.to_string();
        }
        match generator.generate(text, SUMMARY_SYSTEM).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(model = generator.model_name(), "Summary generation failed: {e}");
                GENERATION_FAILED.to_string()
            }
        }
    }

    pub async fn summarize_readme(&self, project: &ProjectRecord) -> String {
        if project.readme_content.trim().is_empty() {
            return NO_README.to_string();
        }
        self.summarize(&readme_summary_prompt(
            &project.name,
            &project.readme_content,
        ))
        .await
    }
}

/// Longest prefix of at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
