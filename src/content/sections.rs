//! Heading-based section parsing for lesson markdown.
//!
//! Only ATX headings of depth 1-3 split a lesson. Deeper headings, and any
//! `#` line inside a fenced code block, stay in the enclosing section's body.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::FALLBACK_PREFIX_CHARS;
use crate::domain::section::heading_id;
use crate::domain::Section;
use crate::error::QuizError;

/// Title of the single section emitted for a lesson without headings
pub const FALLBACK_TITLE: &str = "General Content";

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3})[ \t]+(\S.*)$").expect("Invalid heading regex"));

/// Parse a lesson into sections using the default fallback prefix length.
pub fn parse_sections(markdown: &str) -> Vec<Section> {
    parse_sections_with(markdown, FALLBACK_PREFIX_CHARS)
}

/// Parse a lesson into sections in document order.
///
/// Text before the first heading is discarded. A non-blank lesson with no
/// headings at all becomes one "General Content" section holding at most
/// `fallback_prefix_chars` characters.
pub fn parse_sections_with(markdown: &str, fallback_prefix_chars: usize) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut open: Option<OpenSection> = None;
    let mut fence: Option<Fence> = None;
    let mut offset = 0;

    for raw_line in markdown.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if let Some(current) = fence {
            if current.closes(line) {
                fence = None;
            }
            continue;
        }
        if let Some(opened) = Fence::open(line) {
            fence = Some(opened);
            continue;
        }

        let Some((level, title)) = parse_heading(line) else {
            continue;
        };

        if let Some(prev) = open.take() {
            sections.push(prev.close(markdown, line_start));
        }
        open = Some(OpenSection {
            title,
            level,
            start: line_start,
            content_start: offset,
        });
    }

    if let Some(unclosed) = fence {
        tracing::debug!(
            "Lesson ends inside an unclosed {} code fence, later headings were not split",
            unclosed.marker.to_string().repeat(unclosed.len)
        );
    }

    if let Some(last) = open.take() {
        sections.push(last.close(markdown, markdown.len()));
    }

    if sections.is_empty() {
        let body = markdown.trim();
        if !body.is_empty() {
            tracing::debug!("No headings found, using {} fallback", FALLBACK_TITLE);
            let mut section = Section::new(FALLBACK_TITLE, 1, &char_prefix(body, fallback_prefix_chars));
            section.end = markdown.len();
            sections.push(section);
        }
    }

    sections
}

/// Parse a lesson supplied as raw bytes. Non-UTF-8 input is rejected.
pub fn parse_lesson_bytes(bytes: &[u8]) -> Result<Vec<Section>, QuizError> {
    let markdown = lesson_text(bytes)?;
    Ok(parse_sections(markdown))
}

/// Borrow raw bytes as lesson text.
pub fn lesson_text(bytes: &[u8]) -> Result<&str, QuizError> {
    std::str::from_utf8(bytes).map_err(|e| {
        QuizError::InvalidInput(format!(
            "lesson is not valid UTF-8 (first bad byte at offset {})",
            e.valid_up_to()
        ))
    })
}

/// Enforce an optional size limit. Without a limit every lesson is accepted.
pub fn validate_lesson(markdown: &str, max_bytes: Option<usize>) -> Result<(), QuizError> {
    match max_bytes {
        Some(limit) if markdown.len() > limit => Err(QuizError::InvalidInput(format!(
            "lesson is {} bytes, limit is {}",
            markdown.len(),
            limit
        ))),
        _ => Ok(()),
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn char_prefix(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

struct OpenSection {
    title: String,
    level: u8,
    start: usize,
    content_start: usize,
}

impl OpenSection {
    fn close(self, source: &str, end: usize) -> Section {
        let body = source.get(self.content_start..end).unwrap_or("");
        let content = body.trim_start_matches(['\n', '\r']).trim_end();

        let mut section = Section::new(&self.title, self.level, content);
        section.start = self.start;
        section.end = end;
        section
    }
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next()?;
        if marker != '`' && marker != '~' {
            return None;
        }
        let len = trimmed.chars().take_while(|&c| c == marker).count();
        // A backtick fence's info string cannot contain backticks: "```x``` ..." is inline code
        if marker == '`' && trimmed[len..].contains('`') {
            return None;
        }
        (len >= 3).then_some(Fence { marker, len })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let run = trimmed.chars().take_while(|&c| c == self.marker).count();
        run >= self.len && run == trimmed.chars().count()
    }
}

/// Returns heading level and display title for a boundary heading line.
fn parse_heading(line: &str) -> Option<(u8, String)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2)?.as_str().trim();

    // Optional closing sequence: "## Title ##"
    let without_closing = text.trim_end_matches('#');
    let title = if without_closing.len() < text.len() && without_closing.ends_with(char::is_whitespace) {
        without_closing.trim_end()
    } else {
        text
    };

    Some((level, title.to_string()))
}
