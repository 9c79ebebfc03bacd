use serde::Serialize;
use std::collections::HashSet;

/// Raw points are divided by this before scaling to 0..=100.
///
/// Tunable, kept at 70 so scores stay comparable with earlier reports.
pub const RESCALE_DIVISOR: f64 = 70.0;

/// Prefix window (in characters) for the "keyword up front" bonus.
const KEYWORD_PREFIX_CHARS: usize = 6;
const IDEAL_TITLE_CHARS: std::ops::RangeInclusive<usize> = 50..=70;
const MAX_STOP_WORDS: usize = 3;

const DEFAULT_POWER_WORDS: &[&str] = &[
    "best",
    "ultimate",
    "top",
    "how to",
    "guide",
    "secret",
    "proven",
    "easy",
    "fast",
    "free",
    "amazing",
    "complete",
    "step by step",
    "tips",
    "hacks",
    "review",
    "new",
    "beginner",
];

const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "by",
    "from", "is", "are", "was", "it", "this", "that",
];

const DEFAULT_CLICKBAIT_WORDS: &[&str] = &[
    "you won't believe",
    "shocking",
    "gone wrong",
    "insane",
    "must see",
    "not clickbait",
    "omg",
    "crazy",
    "unbelievable",
];

/// Points contributed by a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub rule: &'static str,
    pub points: i32,
}

/// Fixed, explainable SEO heuristic for a title against a target keyword.
#[derive(Debug, Clone)]
pub struct ScoringHeuristic {
    power_words: Vec<String>,
    stop_words: HashSet<String>,
    clickbait_words: Vec<String>,
}

impl Default for ScoringHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_POWER_WORDS, DEFAULT_STOP_WORDS, DEFAULT_CLICKBAIT_WORDS)
    }
}

impl ScoringHeuristic {
    pub fn new<S: AsRef<str>>(power_words: &[S], stop_words: &[S], clickbait_words: &[S]) -> Self {
        let normalize = |words: &[S]| -> Vec<String> {
            words
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };

        Self {
            power_words: normalize(power_words),
            stop_words: normalize(stop_words).into_iter().collect(),
            clickbait_words: normalize(clickbait_words),
        }
    }

    pub fn score(&self, title: &str, keyword: &str) -> u8 {
        let raw: i32 = self.breakdown(title, keyword).iter().map(|h| h.points).sum();
        rescale(raw)
    }

    /// Every rule that fired, in evaluation order.
    pub fn breakdown(&self, title: &str, keyword: &str) -> Vec<RuleHit> {
        let mut hits = Vec::new();
        let lowered = title.to_lowercase();
        let keyword = keyword.trim().to_lowercase();

        if !keyword.is_empty() {
            if lowered.contains(&keyword) {
                hits.push(RuleHit { rule: "keyword_in_title", points: 20 });
                if starts_within_prefix(title, &keyword) {
                    hits.push(RuleHit { rule: "keyword_up_front", points: 10 });
                }
            }
        }

        if IDEAL_TITLE_CHARS.contains(&title.chars().count()) {
            hits.push(RuleHit { rule: "ideal_length", points: 10 });
        }

        if title.chars().any(|c| c.is_ascii_digit()) {
            hits.push(RuleHit { rule: "has_number", points: 10 });
        }

        if self.power_words.iter().any(|w| lowered.contains(w.as_str())) {
            hits.push(RuleHit { rule: "power_word", points: 10 });
        }

        if !is_all_caps(title) {
            hits.push(RuleHit { rule: "not_all_caps", points: 5 });
        }

        let stop_words_present: HashSet<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| self.stop_words.contains(*w))
            .collect();
        if stop_words_present.len() <= MAX_STOP_WORDS {
            hits.push(RuleHit { rule: "few_stop_words", points: 5 });
        }

        if self.clickbait_words.iter().any(|w| lowered.contains(w.as_str())) {
            hits.push(RuleHit { rule: "clickbait", points: -10 });
        }

        hits
    }
}

fn rescale(raw: i32) -> u8 {
    (raw as f64 * 100.0 / RESCALE_DIVISOR).round().clamp(0.0, 100.0) as u8
}

/// Positions are counted in characters of the original title, since
/// lower-casing can change the character count.
fn starts_within_prefix(title: &str, keyword: &str) -> bool {
    title
        .char_indices()
        .take(KEYWORD_PREFIX_CHARS)
        .any(|(i, _)| title[i..].to_lowercase().starts_with(keyword))
}

/// True only when the title has cased letters and none of them is lower-case.
fn is_all_caps(title: &str) -> bool {
    title.chars().any(|c| c.is_uppercase()) && !title.chars().any(|c| c.is_lowercase())
}
