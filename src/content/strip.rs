//! Reduce lesson markdown to the prose a learner actually reads.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```|~~~.*?~~~").expect("Invalid code fence regex"));

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("Invalid image regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("Invalid link regex"));

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[#*_`~>]").expect("Invalid markup regex"));

/// Strip fenced code, images, link markup (keeping link text) and residual
/// markdown punctuation.
pub fn strip_markdown_noise(content: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(content, "");
    // Images first: their syntax contains a link
    let text = IMAGE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = MARKUP_RE.replace_all(&text, "");
    text.trim().to_string()
}
