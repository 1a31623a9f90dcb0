//! Query tokenizer and name ranker
//!
//! A query is split into lower-cased whitespace tokens. A name is a candidate
//! only when it contains every token; candidates are ordered by a small
//! positional score:
//!
//! - +3 when a token matches at the start of the name
//! - +1 for every token found
//! - +max(0, 2 - index/50) rewarding earlier matches
//! - -len/1000 so shorter names win ties
//!
//! Positions and lengths are counted in characters.

use regex::RegexBuilder;

/// Bonus for a token matching at index 0
const START_BONUS: f64 = 3.0;
/// Bonus for a token found anywhere
const CONTAINS_BONUS: f64 = 1.0;
/// Ceiling of the position-decay bonus
const POSITION_BONUS: f64 = 2.0;
/// Characters over which the position bonus decays by one point
const POSITION_DECAY: f64 = 50.0;
/// Length divisor for the short-name preference
const LENGTH_PENALTY_DIVISOR: f64 = 1000.0;

/// A name with its transient ranking key
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredName {
    pub name: String,
    pub score: f64,
}

/// Split text into lower-cased tokens, dropping empty ones
pub fn tokenize(text: &str) -> Vec<String> {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score a name against tokens. Only orders candidates; never filters.
pub fn score_name(name: &str, tokens: &[String]) -> f64 {
    let lower = name.to_lowercase();
    let mut score = 0.0;

    for token in tokens {
        if let Some(byte_idx) = lower.find(token.as_str()) {
            let idx = lower[..byte_idx].chars().count() as f64;
            if byte_idx == 0 {
                score += START_BONUS;
            }
            score += CONTAINS_BONUS;
            score += (POSITION_BONUS - idx / POSITION_DECAY).max(0.0);
        }
    }

    score - lower.chars().count() as f64 / LENGTH_PENALTY_DIVISOR
}

/// Whether a name contains every token (case-insensitive)
pub fn matches_all(name: &str, tokens: &[String]) -> bool {
    let lower = name.to_lowercase();
    tokens.iter().all(|t| lower.contains(t.as_str()))
}

/// Filter names by tokens and sort them by descending score.
///
/// Returns an empty list for a query without tokens; callers wanting the
/// unfiltered listing must bypass the ranker.
pub fn rank<S: AsRef<str>>(names: &[S], query: &str) -> Vec<ScoredName> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredName> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| matches_all(name, &tokens))
        .map(|name| ScoredName {
            name: name.to_string(),
            score: score_name(name, &tokens),
        })
        .collect();

    // sort_by is stable, so equal scores keep listing order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Ranked names without their scores
pub fn filter_and_rank<S: AsRef<str>>(names: &[S], query: &str) -> Vec<String> {
    rank(names, query).into_iter().map(|s| s.name).collect()
}

/// Split `text` into `(segment, is_match)` spans, marking case-insensitive
/// occurrences of any query token.
pub fn highlight_spans<'a>(text: &'a str, query: &str) -> Vec<(&'a str, bool)> {
    let tokens = tokenize(query);
    if tokens.is_empty() || text.is_empty() {
        return vec![(text, false)];
    }

    let pattern = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(_) => return vec![(text, false)],
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            spans.push((&text[last..m.start()], false));
        }
        spans.push((m.as_str(), true));
        last = m.end();
    }
    if last < text.len() {
        spans.push((&text[last..], false));
    }
    spans
}
