//! services/app/src/adapters/slides.rs
//!
//! This module contains the slide-deck text extractor, implementing the
//! `SlideTextExtraction` port. A deck is a zip archive whose slides live at
//! `ppt/slides/slideN.xml`; the numeric suffix fixes the slide order.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use studydesk_core::ports::{PortError, PortResult, SlideTextExtraction};
use zip::ZipArchive;

/// Extracts the visible text of each slide in a pptx deck.
#[derive(Clone, Default)]
pub struct PptxExtractor;

#[async_trait]
impl SlideTextExtraction for PptxExtractor {
    async fn extract_slide_text(&self, deck: &[u8]) -> PortResult<Vec<String>> {
        let mut archive = ZipArchive::new(Cursor::new(deck))
            .map_err(|e| PortError::Extraction(format!("not a valid slide archive: {}", e)))?;

        let slide_name = Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap();

        let mut slides: Vec<(u32, String)> = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| PortError::Extraction(format!("unreadable archive entry: {}", e)))?;
            let name = entry.name().to_string();
            let Some(captures) = slide_name.captures(&name) else {
                continue;
            };
            let number: u32 = captures[1]
                .parse()
                .map_err(|e| PortError::Extraction(format!("bad slide name '{}': {}", name, e)))?;
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|e| PortError::Extraction(format!("unreadable slide '{}': {}", name, e)))?;
            slides.push((number, xml));
        }
        // slide10 sorts after slide2.
        slides.sort_by_key(|(number, _)| *number);

        slides.into_iter().map(|(_, xml)| slide_text(&xml)).collect()
    }
}

/// Pulls the visible text out of one slide's XML: the `<a:t>` runs, joined
/// with spaces, one line per `<a:p>` paragraph. A slide with no text runs
/// yields an empty string.
fn slide_text(xml: &str) -> PortResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_text_run = false;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_text_run = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"a:t" => in_text_run = false,
            Ok(Event::End(e)) if e.name().as_ref() == b"a:p" => {
                if !current.trim().is_empty() {
                    lines.push(current.trim().to_string());
                }
                current.clear();
            }
            Ok(Event::Text(t)) if in_text_run => {
                let piece = t
                    .unescape()
                    .map_err(|e| PortError::Extraction(format!("bad slide text: {}", e)))?;
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&piece);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(PortError::Extraction(format!("malformed slide xml: {}", e))),
        }
    }
    if !current.trim().is_empty() {
        lines.push(current.trim().to_string());
    }
    Ok(lines.join("\n"))
}

//=========================================================================================
// Tests
//=========================================================================================
