//! Destination tags.
//!
//! A tag is rendered from a strftime format against the local clock and must
//! fully match the configured tag pattern. The same pattern recognises files
//! that already carry a tag.

use crate::Result;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use regex::Regex;

/// Compile `pattern` so that only whole-string matches count.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{})\z", pattern)).map_err(|source| crate::Error::InvalidTagPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Render `format` at `now`.
pub fn render(format: &str, now: &DateTime<Local>) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(crate::Error::InvalidTagFormat(format.to_string()));
    }
    Ok(now.format_with_items(items.into_iter()).to_string())
}

/// A rendered tag together with the pattern that recognises tags.
#[derive(Debug, Clone)]
pub struct Tag {
    text: String,
    char_len: usize,
    pattern: Regex,
}

impl Tag {
    /// Render a tag for the current local time and check it against `pattern`.
    pub fn generate(format: &str, pattern: &str) -> Result<Self> {
        Self::generate_at(format, pattern, &Local::now())
    }

    /// Like [`Tag::generate`], at a fixed time.
    pub fn generate_at(format: &str, pattern: &str, now: &DateTime<Local>) -> Result<Self> {
        let text = render(format, now)?;
        let pattern_re = compile_pattern(pattern)?;
        if !pattern_re.is_match(&text) {
            return Err(crate::Error::TagPatternMismatch {
                tag: text,
                pattern: pattern.to_string(),
            });
        }

        Ok(Self {
            char_len: text.chars().count(),
            text,
            pattern: pattern_re,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether `stem` already ends with a tag.
    ///
    /// Only the trailing run of characters as long as this tag is tested; a
    /// shorter stem is tested whole.
    pub fn is_tagged(&self, stem: &str) -> bool {
        let total = stem.chars().count();
        let start = stem
            .char_indices()
            .nth(total.saturating_sub(self.char_len))
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.pattern.is_match(&stem[start..])
    }
}
