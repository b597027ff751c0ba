pub mod clustering;
pub mod handlers;
pub mod kmeans;
pub mod overview;
pub mod pipeline;
pub mod projection;
pub mod scoring;
pub mod skills;
