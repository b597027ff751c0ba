//! Static knowledge tables for the recommender and career planner.

/// Core domains in priority order; the first skill of each is its representative.
pub const CORE_SKILLS: &[(&str, &[&str])] = &[
    ("Data Analysis", &["Python", "Pandas", "NumPy", "Matplotlib", "Seaborn"]),
    ("Machine Learning", &["Scikit-learn", "TensorFlow", "PyTorch", "Keras"]),
    ("Big Data", &["Spark", "Hadoop", "Kafka"]),
    ("Databases", &["SQL", "PostgreSQL", "MySQL", "MongoDB"]),
    (
        "Web Development/Deployment",
        &["Flask", "Django", "Docker", "AWS", "Streamlit"],
    ),
    ("NLP", &["NLTK", "spaCy", "Hugging Face", "Gensim"]),
];

pub const PROJECT_IDEAS: &[(&str, &str)] = &[
    (
        "Data Analysis",
        "Develop an interactive sales dashboard using Plotly.",
    ),
    (
        "Machine Learning",
        "Build a classification model to predict customer churn.",
    ),
    (
        "Big Data",
        "Create a data pipeline to process real-time streaming data with Spark.",
    ),
    (
        "Databases",
        "Design and implement a relational database for an e-commerce site.",
    ),
    (
        "Web Development/Deployment",
        "Containerize a machine learning app with Docker and deploy it.",
    ),
    (
        "NLP",
        "Perform sentiment analysis on product reviews using Hugging Face transformers.",
    ),
];

/// Skill → learning resource. Keyed by skill name so a domain's representative
/// can look it up directly.
pub const COURSE_SUGGESTIONS: &[(&str, &str)] = &[
    ("Pandas", "https://www.coursera.org/learn/python-data-analysis"),
    (
        "Scikit-learn",
        "https://www.coursera.org/learn/machine-learning-with-python",
    ),
    (
        "Spark",
        "https://www.udemy.com/course/spark-and-python-for-big-data-with-pyspark/",
    ),
    ("SQL", "https://www.coursera.org/learn/sql-for-data-science"),
    (
        "Docker",
        "https://www.udemy.com/course/docker-for-the-absolute-beginner/",
    ),
    (
        "NLTK",
        "https://www.coursera.org/learn/natural-language-processing-specialization",
    ),
];

pub struct RoleRequirements {
    pub role: &'static str,
    pub core: &'static [&'static str],
    pub secondary: &'static [&'static str],
}

pub const TARGET_JOB_SKILLS: &[RoleRequirements] = &[
    RoleRequirements {
        role: "Data Analyst",
        core: &["SQL", "Tableau", "Power BI", "Python", "Pandas"],
        secondary: &["Excel", "Statistics", "Communication"],
    },
    RoleRequirements {
        role: "Data Scientist",
        core: &[
            "Python",
            "Scikit-learn",
            "TensorFlow",
            "PyTorch",
            "SQL",
            "Pandas",
            "Statistics",
        ],
        secondary: &["Spark", "AWS", "Docker", "Communication"],
    },
    RoleRequirements {
        role: "Machine Learning Engineer",
        core: &[
            "Python",
            "TensorFlow",
            "PyTorch",
            "Docker",
            "Kubernetes",
            "AWS",
            "SQL",
        ],
        secondary: &["C++", "Java", "MLflow", "Airflow"],
    },
    RoleRequirements {
        role: "Data Engineer",
        core: &["SQL", "Python", "Spark", "Kafka", "Airflow", "AWS", "Hadoop"],
        secondary: &["Scala", "Java", "Docker", "Kubernetes"],
    },
];

pub fn project_idea(domain: &str) -> Option<&'static str> {
    PROJECT_IDEAS
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, idea)| *idea)
}

pub fn course_for(skill: &str) -> Option<&'static str> {
    COURSE_SUGGESTIONS
        .iter()
        .find(|(s, _)| *s == skill)
        .map(|(_, url)| *url)
}

pub fn role_requirements(role: &str) -> Option<&'static RoleRequirements> {
    TARGET_JOB_SKILLS.iter().find(|r| r.role == role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::skills::SKILL_KEYWORDS;

    #[test]
    fn test_every_domain_has_an_idea() {
        for (domain, skills) in CORE_SKILLS {
            assert!(project_idea(domain).is_some(), "{domain} has no idea");
            assert!(!skills.is_empty());
        }
    }

    #[test]
    fn test_taxonomy_skills_are_detectable() {
        for (_, skills) in CORE_SKILLS {
            for skill in *skills {
                assert!(
                    SKILL_KEYWORDS.iter().any(|(name, _)| name == skill),
                    "{skill} is not in the extractor vocabulary"
                );
            }
        }
    }

    #[test]
    fn test_role_lookup() {
        assert_eq!(role_requirements("Data Engineer").unwrap().core.len(), 7);
        assert!(role_requirements("Astronaut").is_none());
    }
}
