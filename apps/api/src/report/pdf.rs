//! Minimal PDF writer: Helvetica text, word-wrapped, paginated on A4.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::template::ReportLine;
use super::ReportError;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

struct Style {
    font: &'static str,
    size: f32,
    space_before: f32,
}

fn style(line: &ReportLine) -> Style {
    match line {
        ReportLine::Title(_) => Style {
            font: "F2",
            size: 18.0,
            space_before: 0.0,
        },
        ReportLine::Heading(_) => Style {
            font: "F2",
            size: 14.0,
            space_before: 12.0,
        },
        ReportLine::Body(_) => Style {
            font: "F1",
            size: 11.0,
            space_before: 0.0,
        },
    }
}

pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(i, _)| i);
            let rest = word.split_off(split_at);
            lines.push(word);
            word = rest;
        }
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Latin-1 bytes for the WinAnsi-encoded standard fonts; other characters become '?'.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn text_op(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode(text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Lays lines out into pages of content operations.
fn paginate(lines: &[ReportLine]) -> Vec<Vec<Operation>> {
    let usable_width = PAGE_WIDTH - 2.0 * MARGIN;
    let top = PAGE_HEIGHT - MARGIN;
    let mut pages = vec![Vec::new()];
    let mut y = top;

    for line in lines {
        let style = style(line);
        let text = match line {
            ReportLine::Title(t) | ReportLine::Heading(t) | ReportLine::Body(t) => t,
        };
        let leading = style.size * 1.3;
        let max_chars = (usable_width / (style.size * AVG_GLYPH_WIDTH)) as usize;
        y -= style.space_before;

        for segment in wrap(text, max_chars) {
            if y - leading < MARGIN {
                pages.push(Vec::new());
                y = top;
            }
            y -= leading;
            if !segment.is_empty() {
                if let Some(page) = pages.last_mut() {
                    page.extend(text_op(style.font, style.size, MARGIN, y, &segment));
                }
            }
        }
    }
    pages
}

pub fn render_pdf(lines: &[ReportLine]) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids: Vec<ObjectId> = Vec::new();
    for operations in paginate(lines) {
        let content = Content { operations }
            .encode()
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        kids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::from).collect::<Vec<_>>(),
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl xy", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn test_wrap_keeps_blank_lines() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_encode_replaces_non_latin1() {
        assert_eq!(encode("café→"), vec![b'c', b'a', b'f', 0xe9, b'?']);
    }

    #[test]
    fn test_renders_single_page_pdf() {
        let bytes = render_pdf(&[
            ReportLine::Title("Report".into()),
            ReportLine::Body("Hello".into()),
        ])
        .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_reports_paginate() {
        let lines: Vec<_> = (0..200)
            .map(|i| ReportLine::Body(format!("line {i}")))
            .collect();
        let doc = Document::load_mem(&render_pdf(&lines).unwrap()).unwrap();
        assert!(doc.get_pages().len() >= 4);
    }
}
