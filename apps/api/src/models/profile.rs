use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CertificationEntry {
    pub title: String,
    pub issuer: String,
}

/// Fixed-shape view of a professional-network profile export.
/// Sections the parser could not find are left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileDocument {
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub skills: Vec<String>,
}

impl ProfileDocument {
    /// True when no section yielded any content.
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.certifications.is_empty()
            && self.skills.is_empty()
    }

    /// The role listed first in the export, which is the most recent one.
    pub fn most_recent_role(&self) -> Option<&ExperienceEntry> {
        self.experience.first()
    }
}
