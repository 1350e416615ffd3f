//! Filename parser for Japanese daily broadcast recordings.
//!
//! Names such as `211021 タイトル.mp4` or `Show - 2021.10.21 - Title.mkv`
//! are turned into a show title, a `Season (Year)` label and an episode
//! index derived from the air date. User supplied regexes from
//! `jp_scanner.json` cover names without a date.
//!
//! ```no_run
//! use std::path::Path;
//! use jp_scanner::{config, infra::source, EpisodeSource, PatternMatcher};
//!
//! # fn main() -> jp_scanner::Result<()> {
//! let custom = config::load_custom_patterns(Path::new("jp_scanner.json"))?;
//! let matcher = PatternMatcher::new(custom);
//!
//! let path = Path::new("/media/Show/Season (2021)/211021 title.mp4");
//! let show = source::show_dir_name(path);
//! let episode_source =
//!     EpisodeSource::new(path, source::modified_at(path)?).with_show_dir(show.as_deref());
//! if let Some(episode) = matcher.parse(&episode_source)? {
//!     println!("{} {} E{}", episode.title, episode.season_label, episode.episode_index);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod workflows;

pub use domain::models::{EpisodeSpan, MatchSource, ParsedEpisode};
pub use error::{Error, Result};
pub use workflows::index::build_index;
pub use workflows::matchers::{CustomPattern, EpisodeMatch, Matcher};
pub use workflows::scanner::{index_collisions, EpisodeSource, PatternMatcher};
