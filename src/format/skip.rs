//! Raw-title skip patterns.
//!
//! Volume/part/extra divider pages (`第三卷`, `第一部 始まり`, `番外`) keep
//! their hand-laid body layout: matching files still get declaration and
//! head treatment but skip the title update and re-indentation. The match
//! runs against the `<title>` text pulled straight from the unparsed input.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Extract the first `<title>` content from unparsed markup, trimmed.
pub fn extract_raw_title(content: &str) -> Option<&str> {
    TITLE_RE
        .captures(content)
        .map(|caps| caps.get(1).unwrap().as_str().trim())
}

/// Compiled set of title patterns that exempt a file from body formatting.
#[derive(Debug)]
pub struct SkipPatterns(Vec<Regex>);

impl SkipPatterns {
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid skip-title pattern `{p}`")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(compiled))
    }

    /// Empty set: nothing is ever skipped.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn matches(&self, title: &str) -> bool {
        let title = title.trim();
        !title.is_empty() && self.0.iter().any(|re| re.is_match(title))
    }
}
