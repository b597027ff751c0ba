//! Profile HTML export parser.
//!
//! Sections and entries are located by class-name substrings, so minor markup
//! changes between export versions do not break extraction.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::profile::{
    CertificationEntry, EducationEntry, ExperienceEntry, ProfileDocument,
};

const MISSING_ISSUER: &str = "N/A";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

static ABOUT_SECTION: Lazy<Selector> = Lazy::new(|| selector(r#"section[class*="about"]"#));
static EXPERIENCE_SECTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"section[class*="experience"]"#));
static EDUCATION_SECTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"section[class*="education"]"#));
static SKILLS_SECTION: Lazy<Selector> = Lazy::new(|| selector(r#"section[class*="skills"]"#));
static CERTIFICATIONS_SECTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"section[class*="certifications"]"#));

static SUMMARY_BODY: Lazy<Selector> = Lazy::new(|| selector(r#"div[class*="full-profile"]"#));
static ITEM: Lazy<Selector> = Lazy::new(|| selector(r#"li[class*="item"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"h3[class*="title"]"#));
static SUBTITLE: Lazy<Selector> = Lazy::new(|| selector(r#"p[class*="subtitle"]"#));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"div[class*="description"]"#));
static SKILL_ITEM: Lazy<Selector> = Lazy::new(|| selector(r#"li[class*="skill"]"#));
static SKILL_NAME: Lazy<Selector> = Lazy::new(|| selector(r#"span[class*="skill-name"]"#));

/// Text of all descendant text nodes, each trimmed, blanks dropped.
fn text_of(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(|e| text_of(e, ""))
}

fn section<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

pub fn parse_profile_html(html: &str) -> ProfileDocument {
    let document = Html::parse_document(html);
    let mut profile = ProfileDocument::default();

    if let Some(body) = section(&document, &ABOUT_SECTION)
        .and_then(|about| about.select(&SUMMARY_BODY).next())
    {
        profile.summary = text_of(body, "\n");
    }

    if let Some(experience) = section(&document, &EXPERIENCE_SECTION) {
        for job in experience.select(&ITEM) {
            if let (Some(title), Some(company)) =
                (first_text(job, &TITLE), first_text(job, &SUBTITLE))
            {
                let description = job
                    .select(&DESCRIPTION)
                    .next()
                    .map(|d| text_of(d, "\n"))
                    .filter(|d| !d.is_empty());
                profile.experience.push(ExperienceEntry {
                    title,
                    company,
                    description,
                });
            }
        }
    }

    if let Some(education) = section(&document, &EDUCATION_SECTION) {
        for school in education.select(&ITEM) {
            if let (Some(school_name), Some(degree)) =
                (first_text(school, &TITLE), first_text(school, &SUBTITLE))
            {
                profile.education.push(EducationEntry {
                    school: school_name,
                    degree,
                });
            }
        }
    }

    if let Some(skills) = section(&document, &SKILLS_SECTION) {
        profile.skills = skills
            .select(&SKILL_ITEM)
            .filter_map(|item| first_text(item, &SKILL_NAME))
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(certifications) = section(&document, &CERTIFICATIONS_SECTION) {
        for cert in certifications.select(&ITEM) {
            if let Some(title) = first_text(cert, &TITLE) {
                profile.certifications.push(CertificationEntry {
                    title,
                    issuer: first_text(cert, &SUBTITLE)
                        .unwrap_or_else(|| MISSING_ISSUER.to_string()),
                });
            }
        }
    }

    profile
}
