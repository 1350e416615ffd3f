use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::domain::models::MatchSource;

pub mod custom;
pub mod date;
pub mod standard;

pub use custom::CustomPattern;
pub use date::{DatePattern, DateSeparator, DateWidth};
pub use standard::StandardPattern;

/// One entry of the ordered pattern list. Implementations are pure: the same
/// name always yields the same answer.
pub trait Matcher: Send + Sync {
    /// Short human readable label used in logs.
    fn describe(&self) -> &str;

    fn match_name(&self, name: &str) -> Option<EpisodeMatch>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeMatch {
    Dated(DateMatch),
    Literal(LiteralMatch),
}

/// A built-in date pattern hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub show: Option<String>,
    pub episode_title: Option<String>,
    /// The date token exactly as it appeared, separators included.
    pub raw_date: String,
    pub separator: DateSeparator,
    pub width: DateWidth,
    pub date: NaiveDate,
}

/// A custom or standard pattern hit; the episode is used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatch {
    pub title: Option<String>,
    pub episode: String,
    pub season: Option<u32>,
    pub episode_title: Option<String>,
    pub extra: BTreeMap<String, String>,
    pub source: MatchSource,
}

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.+?\]").expect("bracket pattern must compile"));

/// Normalises a captured show or episode-title segment. Returns `None` when
/// nothing meaningful is left.
pub(crate) fn clean_segment(raw: &str) -> Option<String> {
    let without_tags = BRACKETED.replace_all(raw, " ");
    let cleaned = without_tags
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '~'))
        .to_string();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
