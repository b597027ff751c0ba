//! Skill Extractor — matches a fixed technology vocabulary against project text.
//!
//! Each skill owns one or more alias patterns. Patterns are matched
//! case-insensitively with word boundaries against `description + " " + readme`.
//! A skill counts at most once per project no matter how many aliases hit.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::models::project::{ProjectRecord, RepoSkills, SkillTable};

/// Canonical skill name → alias patterns.
pub const SKILL_KEYWORDS: &[(&str, &[&str])] = &[
    ("Python", &[r"\bpython\b"]),
    ("R", &[r"\br\b"]),
    ("SQL", &[r"\bsql\b"]),
    ("Java", &[r"\bjava\b"]),
    // `\b` cannot close a token ending in `+`, so the tail is an explicit non-word-or-end.
    ("C++", &[r"\bc\+\+(?:\W|$)"]),
    ("JavaScript", &[r"\bjavascript\b"]),
    ("HTML", &[r"\bhtml\b"]),
    ("CSS", &[r"\bcss\b"]),
    ("Bash", &[r"\bbash\b"]),
    ("Scala", &[r"\bscala\b"]),
    ("Julia", &[r"\bjulia\b"]),
    ("Pandas", &[r"\bpandas\b"]),
    ("NumPy", &[r"\bnumpy\b"]),
    ("Scikit-learn", &[r"\bscikit-learn\b", r"\bsklearn\b"]),
    ("SciPy", &[r"\bscipy\b"]),
    ("Matplotlib", &[r"\bmatplotlib\b"]),
    ("Seaborn", &[r"\bseaborn\b"]),
    ("Plotly", &[r"\bplotly\b"]),
    ("TensorFlow", &[r"\btensorflow\b"]),
    ("PyTorch", &[r"\bpytorch\b"]),
    ("Keras", &[r"\bkeras\b"]),
    ("spaCy", &[r"\bspacy\b"]),
    ("NLTK", &[r"\bnltk\b"]),
    ("Gensim", &[r"\bgensim\b"]),
    ("Transformers", &[r"\btransformers\b"]),
    ("Hugging Face", &[r"\bhugging face\b", r"\bhuggingface\b"]),
    ("Spark", &[r"\bspark\b", r"\bpyspark\b"]),
    ("Hadoop", &[r"\bhadoop\b"]),
    ("Kafka", &[r"\bkafka\b"]),
    ("Airflow", &[r"\bairflow\b"]),
    ("Docker", &[r"\bdocker\b"]),
    ("Kubernetes", &[r"\bkubernetes\b", r"\bk8s\b"]),
    ("Git", &[r"\bgit\b"]),
    ("Flask", &[r"\bflask\b"]),
    ("Django", &[r"\bdjango\b"]),
    ("Streamlit", &[r"\bstreamlit\b"]),
    ("Dash", &[r"\bdash\b"]),
    ("FastAPI", &[r"\bfastapi\b"]),
    ("AWS", &[r"\baws\b", r"\bamazon web services\b"]),
    ("GCP", &[r"\bgcp\b", r"\bgoogle cloud platform\b"]),
    ("Azure", &[r"\bazure\b"]),
    ("MongoDB", &[r"\bmongodb\b"]),
    ("PostgreSQL", &[r"\bpostgresql\b", r"\bpostgres\b"]),
    ("MySQL", &[r"\bmysql\b"]),
    ("Redis", &[r"\bredis\b"]),
    ("Elasticsearch", &[r"\belasticsearch\b"]),
    ("Tableau", &[r"\btableau\b"]),
    ("Power BI", &[r"\bpower bi\b"]),
];

static DEFAULT_EXTRACTOR: Lazy<SkillExtractor> = Lazy::new(|| {
    SkillExtractor::new(SKILL_KEYWORDS).expect("built-in skill patterns are valid regexes")
});

/// Output of a skill extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillExtraction {
    pub skill_counts: SkillTable,
    pub repo_skills: RepoSkills,
}

struct SkillPatterns {
    name: String,
    patterns: Vec<Regex>,
}

/// Compiled skill vocabulary.
pub struct SkillExtractor {
    skills: Vec<SkillPatterns>,
}

impl SkillExtractor {
    /// Compiles a vocabulary of `(skill, alias patterns)` pairs.
    pub fn new(vocabulary: &[(&str, &[&str])]) -> Result<Self, regex::Error> {
        let skills = vocabulary
            .iter()
            .map(|(name, patterns)| {
                let patterns = patterns
                    .iter()
                    .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SkillPatterns {
                    name: (*name).to_string(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { skills })
    }

    /// The process-wide extractor for the built-in vocabulary.
    pub fn builtin() -> &'static SkillExtractor {
        &DEFAULT_EXTRACTOR
    }

    /// Skills whose aliases match the given text.
    pub fn skills_in(&self, text: &str) -> BTreeSet<String> {
        let text = text.to_lowercase();
        if text.trim().is_empty() {
            return BTreeSet::new();
        }
        self.skills
            .iter()
            .filter(|s| s.patterns.iter().any(|p| p.is_match(&text)))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Builds the aggregate frequency table and the per-project skill sets.
    pub fn extract(&self, projects: &[ProjectRecord]) -> SkillExtraction {
        let mut extraction = SkillExtraction::default();

        for project in projects {
            let text = format!("{} {}", project.description, project.readme_content);
            let found = self.skills_in(&text);
            for skill in &found {
                *extraction.skill_counts.entry(skill.clone()).or_insert(0) += 1;
            }
            extraction.repo_skills.insert(project.name.clone(), found);
        }

        debug!(
            projects = projects.len(),
            unique_skills = extraction.skill_counts.len(),
            "Skill extraction complete"
        );
        extraction
    }
}

/// Runs the built-in extractor.
pub fn extract_skills(projects: &[ProjectRecord]) -> SkillExtraction {
    SkillExtractor::builtin().extract(projects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, description: &str, readme: &str) -> ProjectRecord {
        ProjectRecord::new(name, description).with_readme(readme)
    }

    #[test]
    fn test_builtin_vocabulary_compiles() {
        let extractor = SkillExtractor::builtin();
        assert_eq!(extractor.skills.len(), SKILL_KEYWORDS.len());
    }

    #[test]
    fn test_word_boundary_is_respected() {
        let found = SkillExtractor::builtin().skills_in("a javascript widget");
        assert!(found.contains("JavaScript"));
        assert!(!found.contains("Java"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let found = SkillExtractor::builtin().skills_in("Built with PyTorch and DOCKER");
        assert!(found.contains("PyTorch"));
        assert!(found.contains("Docker"));
    }

    #[test]
    fn test_aliases_count_once_per_project() {
        let projects = vec![project(
            "ml",
            "sklearn pipeline",
            "Uses scikit-learn. More sklearn here.",
        )];
        let result = extract_skills(&projects);
        assert_eq!(result.skill_counts.get("Scikit-learn"), Some(&1));
        assert_eq!(result.repo_skills["ml"].len(), 1);
    }

    #[test]
    fn test_counts_are_distinct_projects() {
        let projects = vec![
            project("a", "python tool", ""),
            project("b", "", "python python python"),
            project("c", "rust tool", ""),
        ];
        let result = extract_skills(&projects);
        assert_eq!(result.skill_counts.get("Python"), Some(&2));
        for (skill, count) in &result.skill_counts {
            let holders = result
                .repo_skills
                .values()
                .filter(|set| set.contains(skill))
                .count() as u32;
            assert_eq!(*count, holders);
        }
    }

    #[test]
    fn test_blank_project_contributes_nothing() {
        let projects = vec![project("empty", "  ", "")];
        let result = extract_skills(&projects);
        assert!(result.skill_counts.is_empty());
        assert!(result.repo_skills["empty"].is_empty());
    }

    #[test]
    fn test_cpp_matches_before_whitespace() {
        let found = SkillExtractor::builtin().skills_in("written in c++ for speed");
        assert!(found.contains("C++"));
    }

    #[test]
    fn test_multi_word_alias() {
        let found = SkillExtractor::builtin().skills_in("dashboards in Power BI and Hugging Face");
        assert!(found.contains("Power BI"));
        assert!(found.contains("Hugging Face"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let extractor = SkillExtractor::new(&[("Rust", &[r"\brust\b"]), ("Go", &[r"\bgolang\b"])])
            .unwrap();
        let found = extractor.skills_in("a rust crate, not golang");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(SkillExtractor::new(&[("Broken", &[r"(unclosed"])]).is_err());
    }
}
