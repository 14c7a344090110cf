//! Markdown helpers for curated documents
//!
//! Curated lists are large READMEs; only one section of each is relevant
//! to the matcher. Sections are cut from the raw text so links survive.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Return the raw markdown under the headings containing `keyword`
///
/// Matching is case-insensitive on the heading text. The section starts
/// after the first matching heading. Every later matching heading moves
/// the anchor level to its own, and the section ends at the next
/// non-matching heading of the same or a shallower level, or at the end of
/// the document. Returns an empty string when no heading matches.
pub fn extract_section(markdown: &str, keyword: &str) -> String {
    let keyword = keyword.to_lowercase();
    let mut heading: Option<(HeadingLevel, String)> = None;
    // (anchor level, start offset)
    let mut section: Option<(HeadingLevel, usize)> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((level, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = heading.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                let Some((level, text)) = heading.take() else {
                    continue;
                };
                let matches = text.to_lowercase().contains(&keyword);
                section = match section {
                    None if matches => Some((level, range.end)),
                    None => None,
                    Some((_, start)) if matches => Some((level, start)),
                    Some((anchor, start)) if level <= anchor => {
                        return markdown[start..range.start].trim().to_string();
                    }
                    keep => keep,
                };
            }
            _ => {}
        }
    }

    match section {
        Some((_, start)) => markdown[start..].trim().to_string(),
        None => String::new(),
    }
}

/// Plain text of all headings, in document order
pub fn headings(markdown: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Option<String> = None;
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(text) = current.take() {
                    out.push(text);
                }
            }
            _ => {}
        }
    }
    out
}
