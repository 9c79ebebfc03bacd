use crate::models::ScoredVideo;
use crate::utils::{compare_optional, days_since};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CSV_HEADER: [&str; 5] = ["Keyword", "Title", "Channel", "Published", "Link"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Views,
    Score,
    Published,
    Growth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "views" => Ok(SortKey::Views),
            "score" | "seo" => Ok(SortKey::Score),
            "published" | "date" => Ok(SortKey::Published),
            "growth" => Ok(SortKey::Growth),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Scored videos in the order they were fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ScoredVideo>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ScoredVideo) {
        self.rows.push(row);
    }

    pub fn extend<I: IntoIterator<Item = ScoredVideo>>(&mut self, rows: I) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[ScoredVideo] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable sort; rows with an unknown value for `key` go last.
    pub fn sort_by(&mut self, key: SortKey, order: SortOrder, now: DateTime<Utc>) {
        self.rows.sort_by(|a, b| match key {
            SortKey::Views => compare_optional(a.video.view_count, b.video.view_count, &order),
            SortKey::Score => compare_optional(Some(a.score), Some(b.score), &order),
            SortKey::Published => {
                compare_optional(a.video.published_at, b.video.published_at, &order)
            }
            SortKey::Growth => {
                compare_optional(growth_per_day(a, now), growth_per_day(b, now), &order)
            }
        });
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_csv_line(&mut out, &CSV_HEADER);

        for row in &self.rows {
            let published = row
                .video
                .published_at
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            write_csv_line(
                &mut out,
                &[
                    row.video.origin_keyword.text.as_str(),
                    row.video.title.as_str(),
                    row.video.channel.as_str(),
                    published.as_str(),
                    row.video.link.as_str(),
                ],
            );
        }

        out
    }
}

impl IntoIterator for ResultTable {
    type Item = ScoredVideo;
    type IntoIter = std::vec::IntoIter<ScoredVideo>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl FromIterator<ScoredVideo> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ScoredVideo>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Average views per day since publishing, when both are known.
pub fn growth_per_day(row: &ScoredVideo, now: DateTime<Utc>) -> Option<u64> {
    let views = row.video.view_count?;
    let published = row.video.published_at?;
    let days = days_since(published, now) as u64;
    Some((views as f64 / days as f64).round() as u64)
}

fn write_csv_line(out: &mut String, fields: &[&str]) {
    let line: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
