//! Fixed report template. All user-supplied text is escaped.

use super::ReportData;

const NO_SCORE: &str = "N/A";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn score_label(total_score: Option<u32>) -> String {
    total_score.map_or_else(|| NO_SCORE.to_string(), |s| s.to_string())
}

fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n    ")
}

pub fn render_html(data: &ReportData) -> String {
    let username = escape_html(&data.username);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Portfolio Analysis Report for {username}</title>
  <style>
    body {{ font-family: Helvetica, Arial, sans-serif; margin: 2em; color: #222; }}
    h1 {{ color: #1f4e79; }}
    .score {{ font-size: 2em; font-weight: bold; }}
  </style>
</head>
<body>
  <h1>Portfolio Analysis Report for {username}</h1>
  <section>
    <h2>Overall Portfolio Score</h2>
    <p class="score">{score}</p>
  </section>
  <section>
    <h2>Summary</h2>
    {summary}
  </section>
  <section>
    <h2>Recommendations</h2>
    {recommendations}
  </section>
</body>
</html>
"#,
        score = score_label(data.total_score),
        summary = paragraphs(&data.summary),
        recommendations = paragraphs(&data.recommendations),
    )
}

/// The same content as [`render_html`] as plain heading/paragraph lines.
pub fn render_lines(data: &ReportData) -> Vec<ReportLine> {
    let mut lines = vec![
        ReportLine::Title(format!("Portfolio Analysis Report for {}", data.username)),
        ReportLine::Heading("Overall Portfolio Score".to_string()),
        ReportLine::Body(score_label(data.total_score)),
        ReportLine::Heading("Summary".to_string()),
    ];
    lines.extend(body_lines(&data.summary));
    lines.push(ReportLine::Heading("Recommendations".to_string()));
    lines.extend(body_lines(&data.recommendations));
    lines
}

fn body_lines(text: &str) -> impl Iterator<Item = ReportLine> + '_ {
    text.lines().map(|l| ReportLine::Body(l.trim_end().to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Title(String),
    Heading(String),
    Body(String),
}
