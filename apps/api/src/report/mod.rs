//! Downloadable analysis report in HTML or PDF form.

pub mod handlers;
pub mod pdf;
pub mod template;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    #[default]
    Pdf,
}

#[derive(Debug, Clone)]
pub struct ReportData {
    pub username: String,
    pub total_score: Option<u32>,
    pub summary: String,
    /// Project-idea text from the recommender.
    pub recommendations: String,
}

#[derive(Debug)]
pub struct RenderedReport {
    pub content_type: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn render(data: &ReportData, format: ReportFormat) -> Result<RenderedReport, ReportError> {
    let stem = format!("portfolio_analysis_{}", sanitize_filename(&data.username));
    Ok(match format {
        ReportFormat::Html => RenderedReport {
            content_type: "text/html; charset=utf-8",
            filename: format!("{stem}.html"),
            bytes: template::render_html(data).into_bytes(),
        },
        ReportFormat::Pdf => RenderedReport {
            content_type: "application/pdf",
            filename: format!("{stem}.pdf"),
            bytes: pdf::render_pdf(&template::render_lines(data))?,
        },
    })
}

/// Renders the report, or `None` when rendering failed. Failures are logged
/// and never produce partial output.
pub fn generate_report(data: &ReportData, format: ReportFormat) -> Option<RenderedReport> {
    match render(data, format) {
        Ok(report) => {
            info!(
                username = %data.username,
                ?format,
                bytes = report.bytes.len(),
                "Report generated"
            );
            Some(report)
        }
        Err(e) => {
            error!(username = %data.username, "Report generation failed: {e}");
            None
        }
    }
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "report".to_string()
    } else {
        cleaned
    }
}
