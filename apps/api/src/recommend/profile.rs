//! Advice for a parsed professional-network profile.

use tracing::debug;

use crate::llm_client::prompts::{profile_summary_advice_prompt, role_description_advice_prompt};
use crate::models::profile::ProfileDocument;
use crate::summarizer::{is_fallback, Summarizer};

const MIN_LISTED_SKILLS: usize = 10;
const MIN_SUGGESTION_CHARS: usize = 10;

pub const ADD_SUMMARY: &str =
    "Add a professional summary to give visitors a clear overview of your background and goals.";
pub const ADD_EXPERIENCE: &str =
    "Add your work experience to build credibility and showcase your professional history.";
pub const EXPAND_SKILLS: &str = "Expand your skills section. Aim to list at least 10-15 relevant skills to improve your profile's visibility in searches.";
pub const PROFILE_SOLID: &str = "Your LinkedIn profile looks solid and covers all key sections!";

/// Ordered list of suggestions; never empty.
pub async fn profile_recommendations(
    profile: &ProfileDocument,
    summarizer: &Summarizer,
) -> Vec<String> {
    let mut advice = Vec::new();

    let summary = profile.summary.trim();
    if summary.is_empty() {
        advice.push(ADD_SUMMARY.to_string());
    } else if let Some(s) = model_suggestion(summarizer, &profile_summary_advice_prompt(summary)).await
    {
        advice.push(s);
    }

    match profile.most_recent_role() {
        None => advice.push(ADD_EXPERIENCE.to_string()),
        Some(role) => match role.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => {
                if let Some(s) =
                    model_suggestion(summarizer, &role_description_advice_prompt(description)).await
                {
                    advice.push(s);
                }
            }
            _ => advice.push(format!(
                "Add a description for your role as '{}' to detail your responsibilities and achievements.",
                role.title
            )),
        },
    }

    if profile.skills.len() < MIN_LISTED_SKILLS {
        advice.push(EXPAND_SKILLS.to_string());
    }

    if advice.is_empty() {
        advice.push(PROFILE_SOLID.to_string());
    }
    advice
}

/// Accepts a model reply only if it is substantive and not a fallback notice.
async fn model_suggestion(summarizer: &Summarizer, prompt: &str) -> Option<String> {
    let reply = summarizer.summarize(prompt).await;
    if is_fallback(&reply)
        || reply.to_lowercase().contains("unavailable")
        || reply.chars().count() <= MIN_SUGGESTION_CHARS
    {
        debug!("Discarding profile suggestion: {reply}");
        return None;
    }
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::profile::ExperienceEntry;
    use crate::test_support::{CannedGenerator, FailingGenerator};

    fn role(title: &str, description: Option<&str>) -> ExperienceEntry {
        ExperienceEntry {
            title: title.into(),
            company: "Acme".into(),
            description: description.map(str::to_string),
        }
    }

    fn skills(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("skill {i}")).collect()
    }

    #[tokio::test]
    async fn test_empty_profile_gets_templated_advice() {
        let advice = profile_recommendations(&ProfileDocument::default(), &Summarizer::new(None))
            .await;
        assert_eq!(advice, vec![ADD_SUMMARY, ADD_EXPERIENCE, EXPAND_SKILLS]);
    }

    #[tokio::test]
    async fn test_missing_role_description_names_the_role() {
        let profile = ProfileDocument {
            summary: String::new(),
            experience: vec![role("Data Analyst", None), role("Intern", Some("Did things"))],
            skills: skills(12),
            ..Default::default()
        };
        let advice = profile_recommendations(&profile, &Summarizer::new(None)).await;
        assert_eq!(
            advice[1],
            "Add a description for your role as 'Data Analyst' to detail your responsibilities and achievements."
        );
        assert_eq!(advice.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_backend_suggestions_are_dropped() {
        let profile = ProfileDocument {
            summary: "Analyst with five years of experience".into(),
            experience: vec![role("Analyst", Some("Built reports"))],
            skills: skills(15),
            ..Default::default()
        };
        let advice = profile_recommendations(&profile, &Summarizer::new(None)).await;
        assert_eq!(advice, vec![PROFILE_SOLID]);
    }

    #[tokio::test]
    async fn test_failed_generation_falls_back_to_templates() {
        let profile = ProfileDocument {
            summary: "Analyst with five years of experience".into(),
            experience: vec![role("Analyst", Some("Built reports"))],
            skills: skills(15),
            ..Default::default()
        };
        let summarizer = Summarizer::new(Some(Arc::new(FailingGenerator)));
        let advice = profile_recommendations(&profile, &summarizer).await;
        assert_eq!(advice, vec![PROFILE_SOLID]);
    }

    #[tokio::test]
    async fn test_model_suggestions_are_kept() {
        let generator = Arc::new(CannedGenerator("Lead with a quantified achievement."));
        let profile = ProfileDocument {
            summary: "Analyst".into(),
            experience: vec![role("Analyst", Some("Built reports"))],
            skills: skills(3),
            ..Default::default()
        };
        let advice = profile_recommendations(&profile, &Summarizer::new(Some(generator))).await;
        assert_eq!(
            advice,
            vec![
                "Lead with a quantified achievement.",
                "Lead with a quantified achievement.",
                EXPAND_SKILLS,
            ]
        );
    }

    #[tokio::test]
    async fn test_short_suggestions_are_dropped() {
        let generator = Arc::new(CannedGenerator("Be bold."));
        let profile = ProfileDocument {
            summary: "Analyst".into(),
            experience: vec![role("Analyst", Some("Built reports"))],
            skills: skills(10),
            ..Default::default()
        };
        let advice = profile_recommendations(&profile, &Summarizer::new(Some(generator))).await;
        assert_eq!(advice, vec![PROFILE_SOLID]);
    }
}
