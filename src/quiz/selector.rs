//! Random selection of a quiz section from scored candidates.
//!
//! Selection works on two tiers:
//! - Sections scoring above the high-quality bar are preferred
//! - If none clear the bar, any qualifying section (score > 0) may be picked
//!
//! Within the chosen tier the draw is either uniform or weighted by score.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::HIGH_QUALITY_SCORE;
use crate::domain::ScoredSection;

/// How a section is drawn from the candidate tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
  /// Every candidate equally likely
  #[default]
  Uniform,
  /// Higher score = more likely to be selected
  Weighted,
}

impl SelectionStrategy {
  pub fn as_str(&self) -> &'static str {
    match self {
      SelectionStrategy::Uniform => "uniform",
      SelectionStrategy::Weighted => "weighted",
    }
  }
}

impl std::fmt::Display for SelectionStrategy {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for SelectionStrategy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "uniform" => Ok(SelectionStrategy::Uniform),
      "weighted" => Ok(SelectionStrategy::Weighted),
      _ => Err(format!("Invalid selection strategy: {}", s)),
    }
  }
}

/// Picks one section out of a scored lesson.
#[derive(Debug, Clone, Copy)]
pub struct SectionSelector {
  pub high_quality_score: u32,
  pub strategy: SelectionStrategy,
}

impl Default for SectionSelector {
  fn default() -> Self {
    Self {
      high_quality_score: HIGH_QUALITY_SCORE,
      strategy: SelectionStrategy::Uniform,
    }
  }
}

impl SectionSelector {
  pub fn new(high_quality_score: u32, strategy: SelectionStrategy) -> Self {
    Self {
      high_quality_score,
      strategy,
    }
  }

  /// The tier a section will be drawn from: high-quality sections if any,
  /// otherwise every qualifying section. Document order is kept.
  pub fn candidate_pool<'a>(&self, scored: &'a [ScoredSection]) -> Vec<&'a ScoredSection> {
    let qualified: Vec<_> = scored.iter().filter(|s| s.is_qualified()).collect();
    let high_quality: Vec<_> = qualified
      .iter()
      .copied()
      .filter(|s| s.score > self.high_quality_score)
      .collect();

    if high_quality.is_empty() {
      qualified
    } else {
      high_quality
    }
  }

  /// Draw a section using the given random source.
  pub fn select<'a, R: Rng + ?Sized>(
    &self,
    scored: &'a [ScoredSection],
    rng: &mut R,
  ) -> Option<&'a ScoredSection> {
    let pool = self.candidate_pool(scored);

    // If only one section, return it
    if pool.len() <= 1 {
      return pool.first().copied();
    }

    match self.strategy {
      SelectionStrategy::Uniform => {
        let idx = rng.random_range(0..pool.len());
        Some(pool[idx])
      }
      SelectionStrategy::Weighted => weighted_random_select(&pool, rng),
    }
  }
}

/// Select a section with probability proportional to its score
fn weighted_random_select<'a, R: Rng + ?Sized>(
  pool: &[&'a ScoredSection],
  rng: &mut R,
) -> Option<&'a ScoredSection> {
  let total_weight: u64 = pool.iter().map(|s| u64::from(s.score)).sum();

  if total_weight == 0 {
    // Fallback to uniform if weights are invalid
    let idx = rng.random_range(0..pool.len());
    return Some(pool[idx]);
  }

  let mut target = rng.random_range(0..total_weight);
  for &section in pool {
    let weight = u64::from(section.score);
    if target < weight {
      return Some(section);
    }
    target -= weight;
  }

  // Fallback to last section
  pool.last().copied()
}

/// Select a section with the default bar, uniform draw and thread RNG.
///
/// Returns `None` when nothing qualifies; the caller decides how to fall back.
pub fn select_best_section(scored: &[ScoredSection]) -> Option<&ScoredSection> {
  select_best_section_with(scored, &mut rand::rng())
}

/// Like [`select_best_section`] with an injected random source.
pub fn select_best_section_with<'a, R: Rng + ?Sized>(
  scored: &'a [ScoredSection],
  rng: &mut R,
) -> Option<&'a ScoredSection> {
  SectionSelector::default().select(scored, rng)
}
