//! Conventional non-date episode layouts, evaluated after custom patterns
//! when enabled.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{clean_segment, EpisodeMatch, LiteralMatch, Matcher};
use crate::domain::models::{EpisodeSpan, MatchSource};

const STANDARD_RX: [(&str, &str); 3] = [
    // S01E02 - Title
    (
        "season-episode",
        r"(?i)^s(?P<season>[0-9]{1,2})e(?P<episode>[0-9]{1,4})(?:[^0-9](?P<episode_title>.*))?$",
    ),
    // Show - S01E02 - Title
    (
        "show-season-episode",
        r"(?i)^(?P<title>.+?)s(?P<season>[0-9]{1,3})e(?P<episode>[0-9]{1,4})(?:[^0-9](?P<episode_title>.*))?$",
    ),
    // Show ep12 Title, Show - ep12 - Title, Show ep12
    (
        "show-ep",
        r"(?i)^(?P<title>.+?)\s?ep(?P<episode>[0-9]{1,4})(?:[^0-9](?P<episode_title>.*))?$",
    ),
];

static MULTI_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    // ep01-ep02, ep01-02, E01-E02, E01-02
    Regex::new(r"(?i)(?:ep|e)(?P<start>[0-9]{1,4})-(?:ep|e)?(?P<end>[0-9]{1,4})")
        .expect("multi-episode pattern must compile")
});

pub struct StandardPattern {
    label: &'static str,
    regex: Regex,
}

pub fn standard_patterns() -> Vec<StandardPattern> {
    STANDARD_RX
        .iter()
        .map(|&(label, rx)| StandardPattern {
            label,
            regex: Regex::new(rx).expect("standard pattern must compile"),
        })
        .collect()
}

impl Matcher for StandardPattern {
    fn describe(&self) -> &str {
        self.label
    }

    fn match_name(&self, name: &str) -> Option<EpisodeMatch> {
        let caps = self.regex.captures(name)?;

        let episode = caps.name("episode")?.as_str().to_string();
        let season = caps
            .name("season")
            .and_then(|m| m.as_str().parse::<u32>().ok());

        Some(EpisodeMatch::Literal(LiteralMatch {
            title: caps.name("title").and_then(|m| clean_segment(m.as_str())),
            episode,
            season,
            episode_title: caps
                .name("episode_title")
                .and_then(|m| clean_segment(m.as_str())),
            extra: BTreeMap::new(),
            source: MatchSource::Standard,
        }))
    }
}

/// Finds an `EP01-EP03` style range in a name.
pub fn episode_span(name: &str) -> Option<EpisodeSpan> {
    let caps = MULTI_EPISODE.captures(name)?;
    let start: u32 = caps.name("start")?.as_str().parse().ok()?;
    let end: u32 = caps.name("end")?.as_str().parse().ok()?;

    (end >= start).then_some(EpisodeSpan { start, end })
}
