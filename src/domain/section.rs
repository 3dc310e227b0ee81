use serde::{Deserialize, Serialize};

/// A heading-delimited span of a lesson body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  /// Slug derived from the title, shared with the table of contents
  pub id: String,
  pub title: String,
  /// Heading depth, 1 to 3
  pub level: u8,
  /// Body between this heading and the next boundary heading
  pub content: String,
  /// Byte offset of the heading line in the source
  pub start: usize,
  /// Byte offset where the next section begins (or end of source)
  pub end: usize,
}

impl Section {
  pub fn new(title: &str, level: u8, content: &str) -> Self {
    let title = title.trim();
    Self {
      id: heading_id(title),
      title: title.to_string(),
      level,
      content: content.to_string(),
      start: 0,
      end: 0,
    }
  }
}

/// Section annotated with its quiz-worthiness score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredSection {
  #[serde(flatten)]
  pub section: Section,
  /// 0 means disqualified
  pub score: u32,
  /// Scoring contributions in the order they were applied
  pub reasons: Vec<String>,
}

impl ScoredSection {
  pub fn is_qualified(&self) -> bool {
    self.score > 0
  }

  pub fn id(&self) -> &str {
    &self.section.id
  }

  pub fn title(&self) -> &str {
    &self.section.title
  }
}

/// Derive the anchor id for a heading: lowercase, drop everything outside
/// `[a-z0-9\s-]`, then turn each whitespace run into a single hyphen.
///
/// Must stay in sync with the slugs the reading-position tracker emits.
pub fn heading_id(title: &str) -> String {
  let lowered = title.to_lowercase();
  let kept: String = lowered
    .chars()
    .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
    .collect();

  let mut id = String::with_capacity(kept.len());
  let mut in_space = false;
  for c in kept.chars() {
    if c.is_whitespace() {
      if !in_space {
        id.push('-');
      }
      in_space = true;
    } else {
      id.push(c);
      in_space = false;
    }
  }
  id
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_heading_id_basic() {
    assert_eq!(heading_id("Section A: Basic Concepts"), "section-a-basic-concepts");
  }

  #[test]
  fn test_heading_id_collapses_whitespace() {
    assert_eq!(heading_id("Big   \t gap"), "big-gap");
  }

  #[test]
  fn test_heading_id_keeps_hyphens_and_digits() {
    assert_eq!(heading_id("Step 2 - Build"), "step-2---build");
  }

  #[test]
  fn test_heading_id_strips_non_ascii() {
    // Accented letters fall outside [a-z0-9]
    assert_eq!(heading_id("Giới thiệu"), "gii-thiu");
  }

  #[test]
  fn test_section_new_trims_title() {
    let section = Section::new("  Loops  ", 2, "body");
    assert_eq!(section.title, "Loops");
    assert_eq!(section.id, "loops");
    assert_eq!(section.level, 2);
  }

  #[test]
  fn test_scored_section_serializes_flat() {
    let scored = ScoredSection {
      section: Section::new("Loops", 2, "body"),
      score: 0,
      reasons: vec!["Too short".into()],
    };
    let json = serde_json::to_value(&scored).unwrap();
    assert_eq!(json["id"], "loops");
    assert_eq!(json["score"], 0);
    assert!(!scored.is_qualified());
  }
}
