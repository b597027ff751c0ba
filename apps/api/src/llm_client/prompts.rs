// Prompt text shared by the summarizer and the profile advisor.

/// System prompt for every summarization-style request.
pub const SUMMARY_SYSTEM: &str = "You are a concise technical writer. \
    Reply with plain prose only, at most three sentences. \
    Do NOT use markdown, bullet points, or preambles such as 'Here is a summary'.";

pub fn readme_summary_prompt(project_name: &str, readme: &str) -> String {
    format!("Summarize the following README for the project '{project_name}':\n\n{readme}")
}

pub fn profile_summary_advice_prompt(summary: &str) -> String {
    format!(
        "Instruction: Review the following professional summary. Provide one concise, \
         actionable suggestion for improvement, focusing on active language and highlighting \
         key skills. Do not just say 'add skills'. Summary: \"{summary}\"\n\nSuggestion:"
    )
}

pub fn role_description_advice_prompt(description: &str) -> String {
    format!(
        "Instruction: Review the following job description. Does it use strong action verbs \
         and include measurable results? Provide one specific improvement. \
         Description: \"{description}\"\n\nSuggestion:"
    )
}
