use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{InsightsError, Result};
use crate::models::{ContentType, UNKNOWN};

// ── DateProcessor ─────────────────────────────────────────────────────────────

/// Date-only patterns tried in order. Month-first wins for ambiguous
/// numeric dates.
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%Y%m%d",
];

/// Date-time patterns whose time component is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Resolves the free-form `date_added` text found in catalog exports.
pub struct DateProcessor;

impl DateProcessor {
    /// Attempt to resolve `value` to a calendar date.
    ///
    /// Handles:
    /// * `None`, empty or whitespace-only text → `None`
    /// * long and abbreviated month names (`"September 9, 2019"`,
    ///   `"Sep 9, 2019"`, `"9 September 2019"`)
    /// * ISO (`"2019-09-09"`), slash and month-first numeric forms
    /// * RFC 3339 and naive date-times, keeping only the date
    ///
    /// No plausibility check is applied: a far-future date is still a date.
    pub fn parse(value: Option<&str>) -> Option<NaiveDate> {
        let s = value?.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        debug!("DateProcessor: could not parse date \"{}\"", s);
        None
    }
}

// ── DurationParser ────────────────────────────────────────────────────────────

/// Result of classifying a `duration` cell for its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParsedDuration {
    /// `"<N> min"` for a movie.
    Minutes(u32),
    /// `"<N> Season"` / `"<N> Seasons"` for a TV show.
    Seasons(u32),
    /// The `"Unknown"` sentinel; counted at zero rather than excluded.
    UnknownSentinel,
}

impl ParsedDuration {
    /// Numeric magnitude; the sentinel maps to `0`.
    pub fn magnitude(self) -> u32 {
        match self {
            ParsedDuration::Minutes(n) | ParsedDuration::Seasons(n) => n,
            ParsedDuration::UnknownSentinel => 0,
        }
    }
}

fn minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+) min$").expect("regex is valid"))
}

fn seasons_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+) Seasons?$").expect("regex is valid"))
}

/// Strips the unit off a `duration` cell, one rule per content type.
pub struct DurationParser;

impl DurationParser {
    /// Classify a movie duration. Anything other than `"<N> min"` or the
    /// sentinel is an [`InsightsError::InvalidDuration`]; `"90 mins"` is
    /// rejected, never coerced to zero.
    pub fn movie(value: &str) -> Result<ParsedDuration> {
        Self::classify(value, &ContentType::Movie, minutes_re()).map(|parsed| match parsed {
            Some(n) => ParsedDuration::Minutes(n),
            None => ParsedDuration::UnknownSentinel,
        })
    }

    /// Classify a TV show duration: `"1 Season"` and `"3 Seasons"` both
    /// parse; the sentinel maps to [`ParsedDuration::UnknownSentinel`].
    pub fn tv_show(value: &str) -> Result<ParsedDuration> {
        Self::classify(value, &ContentType::TvShow, seasons_re()).map(|parsed| match parsed {
            Some(n) => ParsedDuration::Seasons(n),
            None => ParsedDuration::UnknownSentinel,
        })
    }

    /// `Ok(None)` for the sentinel, `Ok(Some(n))` for a match.
    fn classify(value: &str, content_type: &ContentType, re: &Regex) -> Result<Option<u32>> {
        let trimmed = value.trim();
        if trimmed == UNKNOWN {
            return Ok(None);
        }

        let invalid = || InsightsError::InvalidDuration {
            content_type: content_type.to_string(),
            value: value.to_string(),
        };

        let caps = re.captures(trimmed).ok_or_else(invalid)?;
        caps[1].parse::<u32>().map(Some).map_err(|_| invalid())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
