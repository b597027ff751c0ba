//! Portfolio overview: relevance ranking, headline metrics and commit activity.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::models::project::{ProjectRecord, RepoSkills, UNSPECIFIED_LANGUAGE};

const STAR_WEIGHT: f64 = 0.6;
const README_WEIGHT: f64 = 0.2;
const SKILL_WEIGHT: f64 = 0.2;
const SHOWCASE_SIZE: usize = 3;
const NO_LANGUAGE: &str = "N/A";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StarredProject {
    pub name: String,
    pub star_count: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShowcaseProject {
    pub name: String,
    pub description: String,
    pub primary_language: String,
    pub star_count: u32,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DailyCommits {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioOverview {
    pub total_repositories: usize,
    pub most_starred: Option<StarredProject>,
    pub primary_language: String,
    pub showcase: Vec<ShowcaseProject>,
    pub commit_activity: Vec<DailyCommits>,
}

pub fn relevance_score(project: &ProjectRecord, skill_count: usize) -> f64 {
    project.star_count as f64 * STAR_WEIGHT
        + project.readme_len() as f64 * README_WEIGHT
        + skill_count as f64 * SKILL_WEIGHT
}

/// Scores every project and sorts descending; equal scores keep their order.
pub fn rank_by_relevance(projects: &mut [ProjectRecord], repo_skills: &RepoSkills) {
    for project in projects.iter_mut() {
        let skills = repo_skills.get(&project.name).map_or(0, |s| s.len());
        project.relevance_score = Some(relevance_score(project, skills));
    }
    projects.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Most common language other than "Not specified"; ties go to the
/// alphabetically first, and "N/A" when nothing is known.
pub fn primary_language(projects: &[ProjectRecord]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for p in projects {
        if p.primary_language != UNSPECIFIED_LANGUAGE {
            *counts.entry(p.primary_language.as_str()).or_default() += 1;
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (language, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((language, count));
        }
    }
    best.map_or_else(|| NO_LANGUAGE.to_string(), |(l, _)| l.to_string())
}

/// First project with the highest star count.
pub fn most_starred(projects: &[ProjectRecord]) -> Option<StarredProject> {
    let mut best: Option<&ProjectRecord> = None;
    for p in projects {
        if best.map_or(true, |b| p.star_count > b.star_count) {
            best = Some(p);
        }
    }
    best.map(|p| StarredProject {
        name: p.name.clone(),
        star_count: p.star_count,
    })
}

/// Commits per UTC day for every day in `[today − 1 year, today]`, zero-filled.
pub fn commit_activity(projects: &[ProjectRecord], today: NaiveDate) -> Vec<DailyCommits> {
    let start = today.checked_sub_months(Months::new(12)).unwrap_or(today);
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for commit in projects.iter().flat_map(|p| &p.commits) {
        let day = commit.date_naive();
        if day >= start && day <= today {
            *counts.entry(day).or_default() += 1;
        }
    }

    start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|date| DailyCommits {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Builds the overview from projects already sorted by relevance.
pub fn build_overview(projects: &[ProjectRecord], today: NaiveDate) -> PortfolioOverview {
    PortfolioOverview {
        total_repositories: projects.len(),
        most_starred: most_starred(projects),
        primary_language: primary_language(projects),
        showcase: projects
            .iter()
            .take(SHOWCASE_SIZE)
            .map(|p| ShowcaseProject {
                name: p.name.clone(),
                description: p.description.clone(),
                primary_language: p.primary_language.clone(),
                star_count: p.star_count,
                relevance_score: p.relevance_score.unwrap_or(0.0),
            })
            .collect(),
        commit_activity: commit_activity(projects, today),
    }
}
