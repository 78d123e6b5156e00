// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content validation
//!
//! Cheap textual proxies for "did we actually get the real page". Each check
//! is independent; they run in a fixed order and the first rejection wins.

use regex::Regex;
use std::sync::LazyLock;

use super::config::ValidationThresholds;
use super::tables::RoutingTables;
use super::types::{ReasonCode, ValidationVerdict};

#[allow(clippy::expect_used)]
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]{3,}").expect("valid regex"));

/// Precomputed views of the text shared by all checks
struct Sample<'a> {
    text: &'a str,
    lower: String,
    chars: usize,
}

impl<'a> Sample<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
            chars: text.chars().count(),
        }
    }
}

type Check = fn(&ContentValidator, &Sample<'_>) -> Option<ValidationVerdict>;

/// Checks in evaluation order
const CHECKS: &[Check] = &[
    check_nul,
    check_length,
    check_garbage,
    check_blocked,
    check_shell_only,
];

/// Validator over configured thresholds and phrase sets
#[derive(Debug, Clone)]
pub struct ContentValidator {
    thresholds: ValidationThresholds,
    blocked_phrases: Vec<String>,
    shell_phrases: Vec<WordPhrase>,
    content_phrases: Vec<WordPhrase>,
}

/// A phrase that only matches on word boundaries, so "sign in" does not
/// fire inside "design intuitive"
#[derive(Debug, Clone)]
struct WordPhrase {
    phrase: String,
    pattern: Regex,
}

impl WordPhrase {
    fn compile(phrase: &str) -> Option<Self> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return None;
        }
        let word_char = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
        let start = if word_char(phrase.chars().next()) { r"\b" } else { "" };
        let end = if word_char(phrase.chars().last()) { r"\b" } else { "" };
        let pattern = Regex::new(&format!("{}{}{}", start, regex::escape(&phrase), end)).ok()?;
        Some(Self { phrase, pattern })
    }
}

impl ContentValidator {
    pub fn new(tables: &RoutingTables, thresholds: ValidationThresholds) -> Self {
        let words = |v: &[String]| v.iter().filter_map(|p| WordPhrase::compile(p)).collect();
        Self {
            thresholds,
            blocked_phrases: tables
                .blocked_phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            shell_phrases: words(&tables.shell_phrases),
            content_phrases: words(&tables.content_phrases),
        }
    }

    /// Accept the text or say why not
    pub fn validate(&self, text: &str) -> ValidationVerdict {
        let sample = Sample::new(text);
        CHECKS
            .iter()
            .find_map(|check| check(self, &sample))
            .unwrap_or_else(ValidationVerdict::accept)
    }

}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new(&RoutingTables::default(), ValidationThresholds::default())
    }
}

/// Challenge phrases match as substrings so "recaptcha" still counts
fn distinct_hits(lower: &str, phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .filter(|p| lower.contains(p.as_str()))
        .cloned()
        .collect()
}

fn distinct_word_hits(lower: &str, phrases: &[WordPhrase]) -> Vec<String> {
    phrases
        .iter()
        .filter(|p| p.pattern.is_match(lower))
        .map(|p| p.phrase.clone())
        .collect()
}

/// NUL means binary or mis-decoded data no matter how long the text is
fn check_nul(_: &ContentValidator, s: &Sample<'_>) -> Option<ValidationVerdict> {
    s.text
        .contains('\0')
        .then(|| ValidationVerdict::reject(ReasonCode::Garbage, "text contains NUL bytes"))
}

fn check_length(v: &ContentValidator, s: &Sample<'_>) -> Option<ValidationVerdict> {
    let t = &v.thresholds;
    if s.text.trim().is_empty() {
        return Some(ValidationVerdict::reject(ReasonCode::Empty, "no text extracted"));
    }
    if s.chars < t.garbage_min_chars {
        return Some(ValidationVerdict::reject(
            ReasonCode::TooShort,
            format!("{} chars, below garbage screen of {}", s.chars, t.garbage_min_chars),
        ));
    }
    if s.chars < t.min_chars {
        return Some(ValidationVerdict::reject(
            ReasonCode::TooShort,
            format!("{} chars, below minimum of {}", s.chars, t.min_chars),
        ));
    }
    None
}

fn check_garbage(v: &ContentValidator, s: &Sample<'_>) -> Option<ValidationVerdict> {
    let t = &v.thresholds;
    let control = s
        .text
        .chars()
        .filter(|c| (*c as u32) < 32 && !matches!(c, '\n' | '\r' | '\t'))
        .count();
    let ratio = control as f64 / s.chars.max(1) as f64;
    if ratio > t.max_control_ratio {
        return Some(ValidationVerdict::reject(
            ReasonCode::Garbage,
            format!("{:.1}% control characters", ratio * 100.0),
        ));
    }

    let words = WORD_RE.find_iter(s.text).count();
    if words < t.min_words {
        return Some(ValidationVerdict::reject(
            ReasonCode::Garbage,
            format!("only {} words, need {}", words, t.min_words),
        ));
    }
    None
}

fn check_blocked(v: &ContentValidator, s: &Sample<'_>) -> Option<ValidationVerdict> {
    let t = &v.thresholds;
    let hits = distinct_hits(&s.lower, &v.blocked_phrases);
    let blocked = hits.len() >= t.blocked_min_phrases
        || (!hits.is_empty() && s.chars < t.blocked_short_text_chars);
    blocked.then(|| {
        ValidationVerdict::reject(
            ReasonCode::Blocked,
            format!("bot challenge detected: {}", hits.join(", ")),
        )
    })
}

fn check_shell_only(v: &ContentValidator, s: &Sample<'_>) -> Option<ValidationVerdict> {
    let t = &v.thresholds;
    let shell = distinct_word_hits(&s.lower, &v.shell_phrases);
    if shell.len() < t.shell_min_phrases {
        return None;
    }
    let content = distinct_word_hits(&s.lower, &v.content_phrases);
    (content.len() < t.content_min_phrases).then(|| {
        ValidationVerdict::reject(
            ReasonCode::ShellOnly,
            format!("page shell only ({}), no job content", shell.join(", ")),
        )
    })
}
