//! Skill-gap, profile and career-path recommendations.

pub mod career;
pub mod gaps;
pub mod handlers;
pub mod profile;
pub mod taxonomy;
