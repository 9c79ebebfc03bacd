use crate::services::result_table::SortOrder;
use chrono::{DateTime, Duration, Utc};

/// Normalize a free-text view count ("1.2K views", "3tr views", "N/A") to a number.
///
/// Never fails: anything that cannot be read as a count yields 0.
pub fn parse_views(text: &str) -> u64 {
    let lowered = text.to_lowercase().replace("views", "").replace("view", "");
    let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() || compact == "n/a" {
        return 0;
    }

    // "tr" before the single-letter suffixes
    let suffixes: [(&str, f64); 4] = [
        ("tr", 1_000_000.0),
        ("k", 1_000.0),
        ("m", 1_000_000.0),
        ("b", 1_000_000_000.0),
    ];

    for (suffix, multiplier) in suffixes {
        if let Some(number) = compact.strip_suffix(suffix) {
            let number = number.replace(',', "");
            if !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
                return 0;
            }
            return match number.parse::<f64>() {
                Ok(n) if (n * multiplier).round() < u64::MAX as f64 => (n * multiplier).round() as u64,
                _ => 0,
            };
        }
    }

    let digits: String = compact.chars().filter(|c| *c != ',' && *c != '.').collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Parse an RFC 3339 timestamp as delivered by the Data API (`publishedAt`).
pub fn parse_published(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    date_str
        .parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date_str).ok().map(|dt| dt.with_timezone(&Utc)))
}

/// Turn a results-page age ("3 days ago", "Streamed 1 year ago") into an
/// approximate timestamp relative to `now`.
pub fn parse_relative_age(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let captures = regex::Regex::new(
        r"(?i)(\d+)\s*(second|minute|hour|day|week|month|year)s?\s+ago",
    )
    .ok()?
    .captures(text)?;

    let amount: i64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures.get(2)?.as_str().to_lowercase();

    let age = match unit.as_str() {
        "second" => Duration::try_seconds(amount),
        "minute" => Duration::try_minutes(amount),
        "hour" => Duration::try_hours(amount),
        "day" => Duration::try_days(amount),
        "week" => Duration::try_weeks(amount),
        "month" => Duration::try_days(amount.checked_mul(30)?),
        "year" => Duration::try_days(amount.checked_mul(365)?),
        _ => None,
    }?;

    now.checked_sub_signed(age)
}

/// Whole days between `published` and `now`, at least 1.
pub fn days_since(published: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - published).num_days().max(1)
}

pub fn is_valid_video_id(video_id: &str) -> bool {
    regex::Regex::new(r"^[a-zA-Z0-9_-]{11}$")
        .map(|re| re.is_match(video_id))
        .unwrap_or(false)
}

/// Canonical watch URL for a video id, `None` if the id is not a YouTube id.
pub fn watch_url(video_id: &str) -> Option<String> {
    if !is_valid_video_id(video_id) {
        return None;
    }
    url::Url::parse_with_params("https://www.youtube.com/watch", &[("v", video_id)])
        .ok()
        .map(String::from)
}

pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    if let Some(captures) = regex::Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([a-zA-Z0-9_-]{11})",
    )
    .ok()?
    .captures(url)
    {
        return captures.get(1).map(|m| m.as_str().to_string());
    }
    None
}

/// Orders two optional values; `None` always sorts last regardless of `order`.
pub fn compare_optional<T: PartialOrd>(
    a: Option<T>,
    b: Option<T>,
    order: &SortOrder,
) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            SortOrder::Desc => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_views_documented_examples() {
        assert_eq!(parse_views("1,234 views"), 1234);
        assert_eq!(parse_views("2.5k views"), 2500);
        assert_eq!(parse_views("N/A"), 0);
        assert_eq!(parse_views("3tr views"), 3_000_000);
    }

    #[test]
    fn parse_views_is_case_insensitive() {
        assert_eq!(parse_views("1.2K Views"), 1200);
        assert_eq!(parse_views("  3TR VIEWS "), 3_000_000);
        assert_eq!(parse_views("1.5M views"), 1_500_000);
        assert_eq!(parse_views("1 view"), 1);
        assert_eq!(parse_views("n/a"), 0);
    }

    #[test]
    fn parse_views_never_fails() {
        for input in ["", "   ", "views", "No views", "abc", "-5", "-2k", "NaNk", "infk", "1..2k", "🔥"] {
            assert_eq!(parse_views(input), 0, "input {input:?}");
        }
        assert_eq!(parse_views("99999999999999999999999999"), 0);
    }

    #[test]
    fn parse_views_suffix_rejects_exponents_and_overflow() {
        assert_eq!(parse_views("1e300k"), 0);
        assert_eq!(parse_views("1e3k"), 0);
        assert_eq!(parse_views("99999999999999999999999b"), 0);
        assert_eq!(parse_views("12k"), 12_000);
    }

    #[test]
    fn parse_views_dot_grouping_without_suffix() {
        assert_eq!(parse_views("1.234.567"), 1_234_567);
    }

    #[test]
    fn published_parses_rfc3339() {
        let dt = parse_published("2024-05-01T12:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        assert!(parse_published("").is_none());
        assert!(parse_published("yesterday").is_none());
    }

    #[test]
    fn relative_age() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(
            parse_relative_age("3 days ago", now),
            Some(Utc.with_ymd_and_hms(2024, 6, 7, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_relative_age("Streamed 2 weeks ago", now),
            Some(Utc.with_ymd_and_hms(2024, 5, 27, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_relative_age("1 hour ago", now),
            Some(Utc.with_ymd_and_hms(2024, 6, 9, 23, 0, 0).unwrap())
        );
        assert!(parse_relative_age("Premieres tomorrow", now).is_none());
    }

    #[test]
    fn days_since_is_at_least_one() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(days_since(now, now), 1);
        assert_eq!(days_since(now - Duration::days(10), now), 10);
        assert_eq!(days_since(now + Duration::days(2), now), 1);
    }

    #[test]
    fn watch_urls() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ").as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert!(watch_url("short").is_none());
        assert!(watch_url("dQw4w9WgXc&").is_none());
        assert_eq!(
            extract_youtube_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn optional_values_sort_last() {
        use std::cmp::Ordering;
        assert_eq!(compare_optional(Some(1), None, &SortOrder::Asc), Ordering::Less);
        assert_eq!(compare_optional(Some(1), None, &SortOrder::Desc), Ordering::Less);
        assert_eq!(compare_optional(Some(1), Some(2), &SortOrder::Desc), Ordering::Greater);
        assert_eq!(compare_optional::<u64>(None, None, &SortOrder::Asc), Ordering::Equal);
    }
}
