//! DOCX paragraph extraction
//!
//! A DOCX file is a ZIP container; body text lives in `word/document.xml` as
//! WordprocessingML. Each `<w:p>` is a paragraph whose visible text is the
//! concatenation of its `<w:t>` runs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph texts in document order (empty paragraphs included)
pub fn extract_paragraphs(docx_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let xml = read_document_part(docx_bytes)?;
    parse_paragraphs(&xml)
}

fn read_document_part(docx_bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx_bytes))
        .map_err(|e| ExtractionError::Processing(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Processing(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Processing(e.to_string()))?;
    Ok(xml)
}

/// Walk WordprocessingML and collect paragraph text
///
/// Paragraphs nested in text boxes are emitted as their own entries after
/// the paragraph that anchors them. `mc:Fallback` subtrees duplicate their
/// `mc:Choice` sibling and are skipped.
pub fn parse_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    // Indices into `paragraphs` of the currently open `<w:p>` elements
    let mut open: Vec<usize> = Vec::new();
    let mut in_text_run = false;
    let mut fallback_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionError::Processing(format!(
                "Malformed document.xml at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        if fallback_depth > 0 {
            match event {
                Event::Start(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
                Event::End(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"t" => in_text_run = true,
                b"Fallback" => fallback_depth = 1,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => push_to_open(&mut paragraphs, &open, "\t"),
                b"br" | b"cr" => push_to_open(&mut paragraphs, &open, "\n"),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    open.pop();
                }
                b"t" => in_text_run = false,
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Processing(e.to_string()))?;
                push_to_open(&mut paragraphs, &open, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Append to the innermost open paragraph; text outside any paragraph is dropped
fn push_to_open(paragraphs: &mut [String], open: &[usize], text: &str) {
    if let Some(&index) = open.last() {
        paragraphs[index].push_str(text);
    }
}
