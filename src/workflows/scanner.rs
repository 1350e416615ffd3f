//! The ordered pattern scan and assembly of a [`ParsedEpisode`].

use chrono::{Datelike, NaiveDateTime};
use regex::RegexBuilder;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::index::{build_index, season_label};
use super::matchers::{
    clean_segment, date, standard, CustomPattern, DateMatch, EpisodeMatch, LiteralMatch, Matcher,
};
use crate::domain::models::{MatchSource, ParsedEpisode};
use crate::error::Result;

const DEFAULT_SEASON: u32 = 1;

/// What the host knows about one file.
#[derive(Debug, Clone)]
pub struct EpisodeSource<'a> {
    pub path: &'a Path,
    pub modified_at: NaiveDateTime,
    /// Show directory name from the `root/show/Season (Year)/file` layout.
    pub show_dir: Option<&'a str>,
}

impl<'a> EpisodeSource<'a> {
    pub fn new(path: &'a Path, modified_at: NaiveDateTime) -> Self {
        Self {
            path,
            modified_at,
            show_dir: None,
        }
    }

    pub fn with_show_dir(mut self, show_dir: Option<&'a str>) -> Self {
        self.show_dir = show_dir;
        self
    }

    /// File name without its extension.
    pub fn name(&self) -> Cow<'a, str> {
        self.path
            .file_stem()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
    }
}

/// Built-in date patterns, then custom patterns in configured order, then
/// (optionally) the standard episode layouts. First hit wins.
///
/// Holds only immutable compiled patterns, so one instance can be shared by
/// any number of threads for the whole scanning session.
pub struct PatternMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl PatternMatcher {
    pub fn new(custom: Vec<CustomPattern>) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
        for pattern in date::built_in_patterns() {
            matchers.push(Box::new(pattern));
        }
        for pattern in custom {
            matchers.push(Box::new(pattern));
        }
        Self { matchers }
    }

    /// Appends the conventional `S01E02` / `ep12` layouts after every other
    /// pattern.
    pub fn with_standard_patterns(mut self) -> Self {
        for pattern in standard::standard_patterns() {
            self.matchers.push(Box::new(pattern));
        }
        self
    }

    /// Number of patterns tried per name, built-ins included.
    pub fn pattern_count(&self) -> usize {
        self.matchers.len()
    }

    /// Runs the ordered scan over a bare name (no extension).
    pub fn find(&self, name: &str) -> Option<EpisodeMatch> {
        self.matchers.iter().find_map(|matcher| {
            let found = matcher.match_name(name);
            if found.is_some() {
                debug!(file = name, pattern = matcher.describe(), "pattern matched");
            }
            found
        })
    }

    /// Parses one file. `Ok(None)` means the file is not an episode.
    pub fn parse(&self, source: &EpisodeSource<'_>) -> Result<Option<ParsedEpisode>> {
        let name = source.name();
        let Some(found) = self.find(&name) else {
            debug!(file = %name, "no pattern matched");
            return Ok(None);
        };

        let show_dir = source.show_dir.and_then(clean_segment);
        match found {
            EpisodeMatch::Dated(m) => dated_episode(m, source, show_dir).map(Some),
            EpisodeMatch::Literal(m) => Ok(literal_episode(m, &name, show_dir)),
        }
    }
}

fn dated_episode(
    m: DateMatch,
    source: &EpisodeSource<'_>,
    show_dir: Option<String>,
) -> Result<ParsedEpisode> {
    let episode_index = build_index(&m.raw_date, &source.modified_at)?;
    let episode_title = strip_show_name(m.episode_title, show_dir.as_deref());
    let title = m
        .show
        .or(show_dir)
        .or_else(|| episode_title.clone())
        .unwrap_or_else(|| m.date.format("%Y-%m-%d").to_string());

    Ok(ParsedEpisode {
        title,
        season_label: season_label(m.date.year()),
        episode_index,
        episode_title,
        released_on: Some(m.date),
        episode_span: None,
        extra: Default::default(),
        source: MatchSource::BuiltInDate,
    })
}

fn literal_episode(
    m: LiteralMatch,
    name: &str,
    show_dir: Option<String>,
) -> Option<ParsedEpisode> {
    let episode_title = strip_show_name(m.episode_title, show_dir.as_deref());
    let Some(title) = m.title.or(show_dir).or_else(|| episode_title.clone()) else {
        debug!(file = name, "matched without any usable title");
        return None;
    };

    Some(ParsedEpisode {
        title,
        season_label: format!("Season {}", m.season.unwrap_or(DEFAULT_SEASON)),
        episode_index: m.episode,
        episode_title,
        released_on: None,
        episode_span: standard::episode_span(name),
        extra: m.extra,
        source: m.source,
    })
}

/// Drops a repeated show name from an episode title.
fn strip_show_name(episode_title: Option<String>, show: Option<&str>) -> Option<String> {
    let title = episode_title?;
    let Some(show) = show else {
        return Some(title);
    };

    match RegexBuilder::new(&regex::escape(show))
        .case_insensitive(true)
        .build()
    {
        Ok(rx) => clean_segment(&rx.replace_all(&title, " ")),
        Err(_) => Some(title),
    }
}

/// Groups files whose parsed (show, season, episode index) coincide. Only
/// groups with more than one file are returned.
pub fn index_collisions(parsed: &[(PathBuf, ParsedEpisode)]) -> Vec<Vec<PathBuf>> {
    let mut groups: HashMap<(&str, &str, &str), Vec<PathBuf>> = HashMap::new();
    for (path, episode) in parsed {
        groups
            .entry((
                episode.title.as_str(),
                episode.season_label.as_str(),
                episode.episode_index.as_str(),
            ))
            .or_default()
            .push(path.clone());
    }

    let mut collisions: Vec<Vec<PathBuf>> = groups
        .into_values()
        .filter(|paths| paths.len() > 1)
        .collect();
    collisions.sort();
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EpisodeSpan;
    use chrono::NaiveDate;

    fn mtime(m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 10, 21)
            .unwrap()
            .and_hms_opt(12, m, s)
            .unwrap()
    }

    fn parse(matcher: &PatternMatcher, file: &str, show_dir: Option<&str>) -> Option<ParsedEpisode> {
        let path = PathBuf::from(file);
        let source = EpisodeSource::new(&path, mtime(34, 56)).with_show_dir(show_dir);
        matcher.parse(&source).unwrap()
    }

    #[test]
    fn test_short_date_episode() {
        let matcher = PatternMatcher::new(Vec::new());
        let ep = parse(&matcher, "211021 title.mp4", None).unwrap();
        assert_eq!(ep.episode_index, "12110213456");
        assert_eq!(ep.season_label, "Season (2021)");
        assert_eq!(ep.episode_title.as_deref(), Some("title"));
        assert_eq!(ep.title, "title");
        assert_eq!(ep.released_on, NaiveDate::from_ymd_opt(2021, 10, 21));
        assert_eq!(ep.source, MatchSource::BuiltInDate);
    }

    #[test]
    fn test_show_title_resolution() {
        let matcher = PatternMatcher::new(Vec::new());

        let ep = parse(&matcher, "Morning News 20211021.mkv", Some("Ignored Dir")).unwrap();
        assert_eq!(ep.title, "Morning News");

        let ep = parse(&matcher, "20211021 - Weather.mkv", Some("Morning News")).unwrap();
        assert_eq!(ep.title, "Morning News");
        assert_eq!(ep.episode_title.as_deref(), Some("Weather"));

        let ep = parse(&matcher, "20211021.mkv", None).unwrap();
        assert_eq!(ep.title, "2021-10-21");
        assert_eq!(ep.episode_title, None);
    }

    #[test]
    fn test_show_name_removed_from_episode_title() {
        let matcher = PatternMatcher::new(Vec::new());
        let ep = parse(&matcher, "211021 morning news - Typhoon.mkv", Some("Morning News")).unwrap();
        assert_eq!(ep.title, "Morning News");
        assert_eq!(ep.episode_title.as_deref(), Some("Typhoon"));
    }

    #[test]
    fn test_dates_take_priority_over_custom() {
        let custom = CustomPattern::compile_all([r"(?P<title>.+?) (?P<episode>[0-9]+)$"]);
        let matcher = PatternMatcher::new(custom);
        let ep = parse(&matcher, "Show 20211021.mkv", None).unwrap();
        assert_eq!(ep.source, MatchSource::BuiltInDate);
        assert_eq!(ep.episode_index, "120211021");

        let ep = parse(&matcher, "Show 42.mkv", None).unwrap();
        assert_eq!(ep.source, MatchSource::Custom);
        assert_eq!(ep.episode_index, "42");
        assert_eq!(ep.season_label, "Season 1");
    }

    #[test]
    fn test_custom_patterns_keep_configured_order() {
        let custom = CustomPattern::compile_all([
            r"(?P<title>.+?) #(?P<episode>[0-9]+)",
            r"(?P<title>.+?) #(?P<episode>[0-9])",
        ]);
        let matcher = PatternMatcher::new(custom);
        assert_eq!(parse(&matcher, "Show #123.mkv", None).unwrap().episode_index, "123");
    }

    #[test]
    fn test_standard_patterns_are_opt_in() {
        let name = "My Show - S02E05 - Finale.mkv";
        let dates_only = PatternMatcher::new(Vec::new());
        assert_eq!(dates_only.pattern_count(), 8);
        assert!(parse(&dates_only, name, None).is_none());

        let matcher = PatternMatcher::new(Vec::new()).with_standard_patterns();
        assert_eq!(matcher.pattern_count(), 11);
        let ep = parse(&matcher, name, None).unwrap();
        assert_eq!(ep.title, "My Show");
        assert_eq!(ep.season_label, "Season 2");
        assert_eq!(ep.episode_index, "05");
        assert_eq!(ep.source, MatchSource::Standard);
    }

    #[test]
    fn test_multi_episode_span() {
        let matcher = PatternMatcher::new(Vec::new()).with_standard_patterns();
        let ep = parse(&matcher, "My Show EP01-EP02.mkv", None).unwrap();
        assert_eq!(ep.episode_span, Some(EpisodeSpan { start: 1, end: 2 }));
    }

    #[test]
    fn test_literal_match_without_title_is_rejected() {
        let matcher = PatternMatcher::new(Vec::new()).with_standard_patterns();
        assert!(parse(&matcher, "S01E02.mkv", None).is_none());
        assert_eq!(parse(&matcher, "S01E02.mkv", Some("Show")).unwrap().title, "Show");
    }

    #[test]
    fn test_no_match() {
        let matcher = PatternMatcher::new(Vec::new());
        assert!(parse(&matcher, "holiday video.mkv", None).is_none());
    }

    #[test]
    fn test_index_collisions() {
        let matcher = PatternMatcher::new(Vec::new());
        let parsed: Vec<(PathBuf, ParsedEpisode)> =
            ["20211021 a.mkv", "20211021 b.mkv", "20211022 c.mkv"]
                .into_iter()
                .map(|f| (PathBuf::from(f), parse(&matcher, f, Some("Show")).unwrap()))
                .collect();

        let collisions = index_collisions(&parsed);
        assert_eq!(
            collisions,
            vec![vec![PathBuf::from("20211021 a.mkv"), PathBuf::from("20211021 b.mkv")]]
        );
    }
}
