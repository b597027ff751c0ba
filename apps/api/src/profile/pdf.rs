//! Profile PDF export parser: text extraction followed by heading regexes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ProfileError;
use crate::models::profile::{
    CertificationEntry, EducationEntry, ExperienceEntry, ProfileDocument,
};

fn section(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static section pattern is a valid regex")
}

static SUMMARY: Lazy<Regex> = Lazy::new(|| section(r"(?is)Summary\n(.*?)\nExperience"));
static EXPERIENCE: Lazy<Regex> = Lazy::new(|| section(r"(?is)Experience\n(.*?)\nEducation"));
static EDUCATION: Lazy<Regex> =
    Lazy::new(|| section(r"(?is)Education\n(.*?)\nLicenses & certifications"));
static CERTIFICATIONS: Lazy<Regex> =
    Lazy::new(|| section(r"(?is)Licenses & certifications\n(.*?)\nSkills"));
static SKILLS: Lazy<Regex> = Lazy::new(|| section(r"(?is)Skills & endorsements\n(.*?)(?:\n\n|$)"));

pub fn parse_profile_pdf(bytes: &[u8]) -> Result<ProfileDocument, ProfileError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ProfileError::Pdf(e.to_string()))?;
    Ok(parse_profile_text(&text))
}

/// Parses text already extracted from a profile PDF.
pub fn parse_profile_text(text: &str) -> ProfileDocument {
    let text = text.replace("\r\n", "\n");
    let capture = |re: &Regex| {
        re.captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    let mut profile = ProfileDocument {
        summary: capture(&SUMMARY).unwrap_or_default(),
        ..Default::default()
    };

    if let Some(body) = capture(&EXPERIENCE) {
        profile.experience = two_line_blocks(&body)
            .map(|(title, company)| ExperienceEntry {
                title,
                company,
                description: None,
            })
            .collect();
    }
    if let Some(body) = capture(&EDUCATION) {
        profile.education = two_line_blocks(&body)
            .map(|(school, degree)| EducationEntry { school, degree })
            .collect();
    }
    if let Some(body) = capture(&CERTIFICATIONS) {
        profile.certifications = two_line_blocks(&body)
            .map(|(title, issuer)| CertificationEntry { title, issuer })
            .collect();
    }
    if let Some(body) = capture(&SKILLS) {
        profile.skills = body
            .lines()
            .map(str::trim)
            .filter(|s| s.chars().count() > 1)
            .map(str::to_string)
            .collect();
    }

    profile
}

/// Blank-line-separated blocks with at least two lines, as (first, second).
fn two_line_blocks(body: &str) -> impl Iterator<Item = (String, String)> + '_ {
    body.split("\n\n").filter_map(|block| {
        let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
        match (lines.next(), lines.next()) {
            (Some(first), Some(second)) => Some((first.to_string(), second.to_string())),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Jane Doe\r\nSummary\r\nAnalyst who ships.\r\nExperience\r\n\
Senior Analyst\r\nAcme Corp\r\n2020 - Present\r\n\r\nIntern\r\nGlobex\r\n\r\nOrphan line\r\n\
Education\r\nState University\r\nBSc Statistics\r\nLicenses & certifications\r\n\
AWS Practitioner\r\nAmazon\r\nSkills & endorsements\r\nPython\r\nSQL\r\nR\r\n\r\nInterests\r\n";

    #[test]
    fn test_parses_sections_from_text() {
        let profile = parse_profile_text(TEXT);
        assert_eq!(profile.summary, "Analyst who ships.");

        assert_eq!(profile.experience.len(), 2);
        assert_eq!(profile.experience[0].title, "Senior Analyst");
        assert_eq!(profile.experience[0].company, "Acme Corp");
        assert_eq!(profile.experience[1].company, "Globex");

        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.education[0].degree, "BSc Statistics");

        assert_eq!(profile.certifications[0].issuer, "Amazon");

        // Single-character lines are dropped.
        assert_eq!(profile.skills, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_headings_are_case_insensitive() {
        let profile = parse_profile_text("SUMMARY\nHello there\nEXPERIENCE\n");
        assert_eq!(profile.summary, "Hello there");
    }

    #[test]
    fn test_text_without_headings_is_empty() {
        assert!(parse_profile_text("just a resume with no headings").is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(matches!(
            parse_profile_pdf(b"not a pdf"),
            Err(ProfileError::Pdf(_))
        ));
    }
}
