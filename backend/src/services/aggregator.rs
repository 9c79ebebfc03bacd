use crate::models::{Keyword, KeywordSource};
use std::collections::HashSet;

/// Concatenates `sources` in the given order and drops repeats.
///
/// The first occurrence of a text wins; comparison is case-sensitive.
pub fn aggregate<K: AsRef<str> + Clone>(sources: &[Vec<K>]) -> Vec<K> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();

    for item in sources.iter().flatten() {
        if seen.insert(item.as_ref()) {
            merged.push(item.clone());
        }
    }

    merged
}

/// Merges keyword sources in their fixed priority order:
/// manual, suggestions, trending-video titles, rising queries.
pub fn aggregate_keywords(
    manual: &[String],
    suggestions: &[String],
    trending_titles: &[String],
    rising: &[String],
) -> Vec<Keyword> {
    aggregate(&[
        Keyword::tag_all(manual, KeywordSource::Manual),
        Keyword::tag_all(suggestions, KeywordSource::Suggestion),
        Keyword::tag_all(trending_titles, KeywordSource::Trending),
        Keyword::tag_all(rising, KeywordSource::Rising),
    ])
}

/// `selected` as-is when the user picked anything, otherwise every keyword.
pub fn filter<K: Clone>(keywords: &[K], selected: &[K]) -> Vec<K> {
    if selected.is_empty() {
        keywords.to_vec()
    } else {
        selected.to_vec()
    }
}

/// Resolves a user selection of plain strings against the aggregated list,
/// keeping the source tag of known keywords and tagging unknown ones manual.
pub fn filter_keywords(keywords: &[Keyword], selected: &[String]) -> Vec<Keyword> {
    let selected: Vec<Keyword> = selected
        .iter()
        .filter_map(|text| {
            keywords
                .iter()
                .find(|k| k.text == text.trim())
                .cloned()
                .or_else(|| Keyword::manual(text))
        })
        .collect();

    filter(keywords, &selected)
}
