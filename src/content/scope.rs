//! Progress-aware scoping: restrict a lesson to what the learner has read.

use crate::domain::Section;

/// Sections from the start of the lesson through the learner's current heading.
///
/// `None` (or an empty id) means review mode and returns everything. An id that
/// matches no section fails open to the full lesson. Duplicate ids resolve to
/// the first occurrence.
pub fn scope_sections<'a>(sections: &'a [Section], current_heading_id: Option<&str>) -> &'a [Section] {
  let Some(heading_id) = current_heading_id.filter(|id| !id.is_empty()) else {
    return sections;
  };

  match sections.iter().position(|s| s.id == heading_id) {
    Some(idx) => {
      tracing::debug!("Scoped to {} of {} sections (through '{}')", idx + 1, sections.len(), heading_id);
      &sections[..=idx]
    }
    None => {
      if !sections.is_empty() {
        tracing::warn!("Unknown heading id '{}', using full lesson", heading_id);
      }
      sections
    }
  }
}
