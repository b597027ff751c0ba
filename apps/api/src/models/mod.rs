pub mod profile;
pub mod project;
