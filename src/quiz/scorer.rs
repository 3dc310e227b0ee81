//! Quiz-worthiness scoring for lesson sections.
//!
//! Each section is scored independently from its title and body:
//! - Titles containing a blocklisted marker (summary, setup, ...) are disqualified
//! - Sections with less than `min_prose_chars` of readable prose are disqualified
//! - Otherwise the prose length (capped) forms the base score
//! - Every distinct explanatory keyword adds a fixed bonus
//! - Sections that are mostly code or media get their score halved
//!
//! Scoring is deterministic: the same title and content always produce the
//! same score and reasons.

use crate::config::QuizConfig;
use crate::content::strip_markdown_noise;
use crate::domain::{ScoredSection, Section};

/// Title markers for sections that rarely make good quiz material.
pub const TITLE_BLOCKLIST: &[&str] = &[
    "reference",
    "summary",
    "conclusion",
    "introduction",
    "setup",
    "installation",
    "prerequisite",
    "next steps",
    // Vietnamese
    "tham khảo",
    "tóm tắt",
    "kết luận",
    "giới thiệu",
    "cài đặt",
    "tiên quyết",
    "bước tiếp theo",
];

/// Markers of explanatory prose.
pub const EXPLANATORY_KEYWORDS: &[&str] = &[
    "because",
    "means",
    "example",
    "however",
    "therefore",
    "defined as",
    "definition",
    "formula",
    "equation",
    // Vietnamese
    "bởi vì",
    "nghĩa là",
    "ví dụ",
    "tuy nhiên",
    "do đó",
    "định nghĩa",
    "công thức",
    "phương trình",
];

/// Scores sections against a fixed set of thresholds and word lists.
#[derive(Debug, Clone)]
pub struct SectionScorer {
    blocklist: Vec<String>,
    keywords: Vec<String>,
    min_prose_chars: usize,
    max_length_score: u32,
    keyword_bonus: u32,
    code_heavy_ratio: f64,
}

impl Default for SectionScorer {
    fn default() -> Self {
        Self::new(&QuizConfig::default())
    }
}

impl SectionScorer {
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            blocklist: merge_terms(TITLE_BLOCKLIST, &config.extra_blocklist),
            keywords: merge_terms(EXPLANATORY_KEYWORDS, &config.extra_keywords),
            min_prose_chars: config.min_prose_chars,
            max_length_score: config.max_length_score,
            keyword_bonus: config.keyword_bonus,
            code_heavy_ratio: config.code_heavy_ratio,
        }
    }

    /// Score every section, keeping document order.
    pub fn score_sections(&self, sections: &[Section]) -> Vec<ScoredSection> {
        sections.iter().map(|s| self.score_section(s)).collect()
    }

    pub fn score_section(&self, section: &Section) -> ScoredSection {
        let (score, reasons) = self.evaluate(&section.title, &section.content);
        if score == 0 {
            tracing::debug!("Section '{}' disqualified: {}", section.id, reasons.join("; "));
        }
        ScoredSection {
            section: section.clone(),
            score,
            reasons,
        }
    }

    fn evaluate(&self, title: &str, content: &str) -> (u32, Vec<String>) {
        let mut reasons = Vec::new();

        let lowered_title = title.to_lowercase();
        if let Some(term) = self.blocklist.iter().find(|t| lowered_title.contains(t.as_str())) {
            reasons.push(format!("Blocklisted title term \"{}\"", term));
            return (0, reasons);
        }

        let prose = strip_markdown_noise(content);
        let prose_len = prose.chars().count();
        if prose_len < self.min_prose_chars {
            reasons.push(format!(
                "Too short: {} chars of prose (minimum {})",
                prose_len, self.min_prose_chars
            ));
            return (0, reasons);
        }

        let base = (prose_len as u64).min(self.max_length_score as u64) as u32;
        let mut score = base as f64;
        reasons.push(format!("Length: +{} ({} chars of prose)", base, prose_len));

        let lowered_prose = prose.to_lowercase();
        for keyword in &self.keywords {
            if lowered_prose.contains(keyword.as_str()) {
                score += self.keyword_bonus as f64;
                reasons.push(format!("Keyword \"{}\": +{}", keyword, self.keyword_bonus));
            }
        }

        // prose_len > 0 here, so content is non-empty
        let content_len = content.chars().count();
        let ratio = prose_len as f64 / content_len as f64;
        if ratio < self.code_heavy_ratio {
            score /= 2.0;
            reasons.push(format!(
                "Code-heavy: {:.0}% prose, score halved",
                ratio * 100.0
            ));
        }

        (score.round() as u32, reasons)
    }
}

/// Score sections with the default thresholds.
pub fn score_sections(sections: &[Section]) -> Vec<ScoredSection> {
    SectionScorer::default().score_sections(sections)
}

/// Sections ordered by score, highest first. Ties keep document order.
pub fn rank_sections(scored: &[ScoredSection]) -> Vec<&ScoredSection> {
    let mut ranked: Vec<&ScoredSection> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Built-in terms followed by configured extras, lowercased and deduplicated.
fn merge_terms(builtin: &[&str], extra: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::with_capacity(builtin.len() + extra.len());
    for term in builtin.iter().copied().chain(extra.iter().map(String::as_str)) {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
