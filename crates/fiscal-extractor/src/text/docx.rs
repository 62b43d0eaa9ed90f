//! Word-processor documents (`.docx`)
//!
//! A `.docx` is a zip container; the body lives in `word/document.xml`.
//! Only top-level body paragraphs count, table cells do not.

use crate::error::TextError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Read every body paragraph, joined by newlines
pub(crate) fn read_paragraphs(path: &Path) -> Result<String, TextError> {
    let invalid = |reason: String| TextError::WordDocument {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|source| TextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| invalid(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| invalid(format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| invalid(e.to_string()))?;

    let paragraphs = paragraphs_from_xml(&xml).map_err(invalid)?;
    Ok(paragraphs.join("\n"))
}

/// Collect the text of each top-level paragraph in document order
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    // Tab stops in paragraph properties are also `w:tab`; only runs carry text
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("XML error at {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 && table_depth == 0 {
                        current = Some(String::new());
                    }
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    if paragraph_depth == 1 {
                        if let Some(text) = current.take() {
                            paragraphs.push(text);
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => {
                let in_body_run = paragraph_depth == 1 && run_depth > 0;
                match e.name().as_ref() {
                    b"w:p" if paragraph_depth == 0 && table_depth == 0 => {
                        paragraphs.push(String::new())
                    }
                    b"w:tab" if in_body_run => push_to(&mut current, "\t"),
                    b"w:br" | b"w:cr" if in_body_run => push_to(&mut current, "\n"),
                    _ => {}
                }
            }
            Event::Text(t) if in_text && paragraph_depth == 1 => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                push_to(&mut current, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}
