use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use tracing::warn;

use super::{clean_segment, EpisodeMatch, LiteralMatch, Matcher};
use crate::domain::models::MatchSource;
use crate::error::{Error, Result};

const REQUIRED_GROUPS: [&str; 2] = ["title", "episode"];

/// A user supplied regex with `title` and `episode` named groups.
///
/// Patterns are case-insensitive and tied to the start of the name, so
/// `(?P<title>.+?) EP(?P<episode>\d+)$` behaves the same with or without a
/// leading `^`.
#[derive(Debug, Clone)]
pub struct CustomPattern {
    source: String,
    regex: Regex,
}

impl CustomPattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Err(Error::malformed(pattern, "pattern is empty"));
        }

        let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::malformed(pattern, e.to_string()))?;

        let names: Vec<&str> = regex.capture_names().flatten().collect();
        for group in REQUIRED_GROUPS {
            if !names.contains(&group) {
                return Err(Error::malformed(
                    pattern,
                    format!("missing named group `{group}`"),
                ));
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Compiles every pattern, dropping the ones that fail. A broken entry
    /// never takes the others down with it.
    pub fn compile_all<'a, I>(patterns: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        patterns
            .into_iter()
            .filter_map(|pattern| match Self::compile(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    warn!("Skipping custom pattern: {e}");
                    None
                }
            })
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Matcher for CustomPattern {
    fn describe(&self) -> &str {
        &self.source
    }

    fn match_name(&self, name: &str) -> Option<EpisodeMatch> {
        let caps = self.regex.captures(name)?;

        let title = caps.name("title").and_then(|m| clean_segment(m.as_str()))?;
        let episode = caps
            .name("episode")
            .map(|m| m.as_str().trim())
            .filter(|e| !e.is_empty())?
            .to_string();

        let extra: BTreeMap<String, String> = self
            .regex
            .capture_names()
            .flatten()
            .filter(|group| !REQUIRED_GROUPS.contains(group))
            .filter_map(|group| {
                let value = caps.name(group)?.as_str().trim();
                (!value.is_empty()).then(|| (group.to_string(), value.to_string()))
            })
            .collect();

        Some(EpisodeMatch::Literal(LiteralMatch {
            title: Some(title),
            episode,
            season: None,
            episode_title: None,
            extra,
            source: MatchSource::Custom,
        }))
    }
}
