//! Built-in recognisers for Japanese broadcast-date tokens.
//!
//! Supported shapes, each optionally preceded by a show segment and followed
//! by an episode title:
//!
//! - `YYYYMMDD`, `YYYY-MM-DD`, `YYYY_MM_DD`, `YYYY.MM.DD`
//! - `YYMMDD`, `YY-MM-DD`, `YY_MM_DD`, `YY.MM.DD`

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::{clean_segment, DateMatch, EpisodeMatch, Matcher};
use crate::workflows::index::expand_year;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWidth {
    /// `YYYYMMDD`
    Long,
    /// `YYMMDD`
    Short,
}

impl DateWidth {
    pub fn digits(self) -> usize {
        match self {
            DateWidth::Long => 8,
            DateWidth::Short => 6,
        }
    }

    fn year_digits(self) -> usize {
        self.digits() - 4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSeparator {
    Dash,
    Underscore,
    Dot,
    None,
}

impl DateSeparator {
    /// Delimited styles first; the bare form is the most ambiguous.
    pub const ALL: [DateSeparator; 4] = [
        DateSeparator::Dash,
        DateSeparator::Underscore,
        DateSeparator::Dot,
        DateSeparator::None,
    ];

    fn regex(self) -> &'static str {
        match self {
            DateSeparator::Dash => "-",
            DateSeparator::Underscore => "_",
            DateSeparator::Dot => r"\.",
            DateSeparator::None => "",
        }
    }
}

pub struct DatePattern {
    width: DateWidth,
    separator: DateSeparator,
    label: String,
    regex: Regex,
}

impl DatePattern {
    pub fn new(width: DateWidth, separator: DateSeparator) -> Self {
        let sep = separator.regex();
        let year = width.year_digits();
        // [0-9] rather than \d: the latter also accepts non-ASCII digits.
        // Candidate tokens only; the digit boundaries keep a short form from
        // matching inside a longer digit run.
        let pattern = format!(
            r"(?:^|[^0-9])(?P<date>(?P<year>[0-9]{{{year}}}){sep}(?P<month>[0-9]{{2}}){sep}(?P<day>[0-9]{{2}}))(?:[^0-9]|$)"
        );
        let regex = Regex::new(&pattern).expect("built-in date pattern must compile");

        Self {
            width,
            separator,
            label: format!("{width:?}/{separator:?}"),
            regex,
        }
    }

    pub fn width(&self) -> DateWidth {
        self.width
    }

    pub fn separator(&self) -> DateSeparator {
        self.separator
    }
}

/// The built-in table in priority order: every 8-digit form before any
/// 6-digit form, delimited before bare within a width.
pub fn built_in_patterns() -> Vec<DatePattern> {
    [DateWidth::Long, DateWidth::Short]
        .into_iter()
        .flat_map(|width| {
            DateSeparator::ALL
                .into_iter()
                .map(move |separator| DatePattern::new(width, separator))
        })
        .collect()
}

impl Matcher for DatePattern {
    fn describe(&self) -> &str {
        &self.label
    }

    /// Returns the leftmost candidate token that is a real calendar date.
    /// Impossible dates (`991399`) are skipped, not fatal.
    fn match_name(&self, name: &str) -> Option<EpisodeMatch> {
        let mut from = 0;
        while let Some(caps) = self.regex.captures_at(name, from) {
            let token = caps.name("date")?;
            // Tokens start with an ASCII digit, so +1 stays on a char boundary.
            from = token.start() + 1;

            let year = expand_year(caps.name("year")?.as_str())?;
            let month: u32 = caps.name("month")?.as_str().parse().ok()?;
            let day: u32 = caps.name("day")?.as_str().parse().ok()?;
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                debug!(
                    pattern = %self.label,
                    file = name,
                    token = token.as_str(),
                    "date-like token is not a calendar date"
                );
                continue;
            };

            return Some(EpisodeMatch::Dated(DateMatch {
                show: clean_segment(drop_last_char(&name[..token.start()])),
                episode_title: clean_segment(drop_first_char(&name[token.end()..])),
                raw_date: token.as_str().to_string(),
                separator: self.separator,
                width: self.width,
                date,
            }));
        }

        None
    }
}

/// Strips the boundary character left of a date token.
fn drop_last_char(segment: &str) -> &str {
    segment
        .char_indices()
        .next_back()
        .map_or(segment, |(idx, _)| &segment[..idx])
}

/// Strips the boundary character right of a date token.
fn drop_first_char(segment: &str) -> &str {
    let mut chars = segment.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(m: &DateMatch) -> String {
        m.raw_date.replace(['-', '_', '.'], "")
    }

    fn first_match(name: &str) -> Option<DateMatch> {
        built_in_patterns()
            .iter()
            .find_map(|p| p.match_name(name))
            .map(|m| match m {
                EpisodeMatch::Dated(d) => d,
                EpisodeMatch::Literal(_) => panic!("date pattern produced a literal match"),
            })
    }

    #[test]
    fn test_priority_order() {
        let patterns = built_in_patterns();
        assert_eq!(patterns.len(), 8);
        assert!(patterns[..4].iter().all(|p| p.width() == DateWidth::Long));
        assert!(patterns[4..].iter().all(|p| p.width() == DateWidth::Short));
        assert_eq!(patterns[3].separator(), DateSeparator::None);
        assert_eq!(patterns[7].separator(), DateSeparator::None);
    }

    #[test]
    fn test_long_separator_styles_normalise_identically() {
        for name in [
            "20211021 title",
            "2021-10-21 title",
            "2021_10_21 title",
            "2021.10.21 title",
        ] {
            let m = first_match(name).unwrap();
            assert_eq!(digits(&m), "20211021", "{name}");
            assert_eq!(m.width, DateWidth::Long);
            assert_eq!(m.episode_title.as_deref(), Some("title"));
        }
    }

    #[test]
    fn test_separator_style_is_reported() {
        assert_eq!(first_match("21-10-21").unwrap().separator, DateSeparator::Dash);
        assert_eq!(first_match("21_10_21").unwrap().separator, DateSeparator::Underscore);
        assert_eq!(first_match("21.10.21").unwrap().separator, DateSeparator::Dot);
        assert_eq!(first_match("211021").unwrap().separator, DateSeparator::None);
    }

    #[test]
    fn test_short_date() {
        let m = first_match("211021 title").unwrap();
        assert_eq!(m.raw_date, "211021");
        assert_eq!(m.width, DateWidth::Short);
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2021, 10, 21).unwrap());
        assert_eq!(m.show, None);
    }

    #[test]
    fn test_long_date_wins_over_embedded_short() {
        let m = first_match("Show 211021 20211022 extra").unwrap();
        assert_eq!(m.width, DateWidth::Long);
        assert_eq!(digits(&m), "20211022");
        assert_eq!(m.show.as_deref(), Some("Show 211021"));
    }

    #[test]
    fn test_show_and_episode_title_segments() {
        let m = first_match("My Show - 2021.10.21 - The Finale").unwrap();
        assert_eq!(m.show.as_deref(), Some("My Show"));
        assert_eq!(m.episode_title.as_deref(), Some("The Finale"));

        let m = first_match("My Show 211021").unwrap();
        assert_eq!(m.show.as_deref(), Some("My Show"));
        assert_eq!(m.episode_title, None);

        let m = first_match("211021 - ").unwrap();
        assert_eq!(m.episode_title, None);
    }

    #[test]
    fn test_short_pattern_needs_digit_boundaries() {
        assert!(first_match("2110211 title").is_none());
        assert!(first_match("Show 1211021").is_none());
        assert!(first_match("no digits here").is_none());
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        assert!(first_match("211332 title").is_none());
        assert!(first_match("2021-02-30").is_none());
    }

    #[test]
    fn test_mixed_separators_do_not_match() {
        assert!(first_match("2021-10_21 title").is_none());
    }

    #[test]
    fn test_impossible_date_before_air_date_is_skipped() {
        let m = first_match("Show 123456 211021 News").unwrap();
        assert_eq!(m.raw_date, "211021");
        assert_eq!(m.show.as_deref(), Some("Show 123456"));
        assert_eq!(m.episode_title.as_deref(), Some("News"));

        let m = first_match("Show 12345678 20211021 News").unwrap();
        assert_eq!(m.raw_date, "20211021");
        assert_eq!(m.width, DateWidth::Long);

        let m = first_match("Show 991399 211021").unwrap();
        assert_eq!(m.raw_date, "211021");
        assert_eq!(m.episode_title, None);
    }

    #[test]
    fn test_adjacent_dotted_tokens() {
        let m = first_match("My.Show.2021.13.01.2021.10.21").unwrap();
        assert_eq!(m.raw_date, "2021.10.21");
        assert_eq!(m.show.as_deref(), Some("My.Show.2021.13.01"));
    }
}
