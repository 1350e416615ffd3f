use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which tier of the pattern list produced a result.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    BuiltInDate,
    Custom,
    Standard,
}

/// Inclusive episode range for multi-episode files (`EP01-EP02`).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSpan {
    pub start: u32,
    pub end: u32,
}

/// Result of parsing one file. Built per call and handed straight back to
/// the caller.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ParsedEpisode {
    pub title: String,
    pub season_label: String,
    pub episode_index: String,
    pub episode_title: Option<String>,
    pub released_on: Option<NaiveDate>,
    pub episode_span: Option<EpisodeSpan>,
    /// Named groups of a custom pattern beyond `title` and `episode`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    pub source: MatchSource,
}
