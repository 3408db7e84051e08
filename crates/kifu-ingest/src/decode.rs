//! Field decoders: raw tag strings to typed values.
//!
//! All decoders are pure. Only date, handicap and event decoding can fail;
//! rank and winner decoding fall back to sentinels.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::country::{Country, NATIONALITY_WORDS};
use crate::moves::Winner;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("undecodable date field {0:?}")]
    Date(String),
    #[error("handicap is not an integer: {0:?}")]
    Handicap(String),
    #[error("no ordinal found in event {0:?}")]
    EventOrdinal(String),
}

// ============================================================================
// Date
// ============================================================================

struct DateShape {
    regex: Regex,
    has_month: bool,
    has_day: bool,
}

fn date_shapes() -> &'static [DateShape; 3] {
    static SHAPES: OnceLock<[DateShape; 3]> = OnceLock::new();
    SHAPES.get_or_init(|| {
        [
            DateShape {
                regex: Regex::new(r"([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})").expect("static regex"),
                has_month: true,
                has_day: true,
            },
            DateShape {
                regex: Regex::new(r"([0-9]{4})-([0-9]{1,2})").expect("static regex"),
                has_month: true,
                has_day: false,
            },
            DateShape {
                regex: Regex::new(r"([0-9]{4})").expect("static regex"),
                has_month: false,
                has_day: false,
            },
        ]
    })
}

/// Decode a date tag into `YYYY-MM-DD`.
///
/// Tries `YYYY-MM-DD`, then `YYYY-MM`, then `YYYY`, each searched anywhere in
/// the string. Missing month or day default to 1.
pub fn decode_date(raw: &str) -> Result<String, DecodeError> {
    for shape in date_shapes() {
        let Some(caps) = shape.regex.captures(raw) else {
            continue;
        };
        let field = |i: usize| -> Result<u32, DecodeError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| DecodeError::Date(raw.to_string()))
        };
        let year = field(1)?;
        let month = if shape.has_month { field(2)? } else { 1 };
        let day = if shape.has_day { field(3)? } else { 1 };
        return Ok(format!("{year:04}-{month:02}-{day:02}"));
    }
    Err(DecodeError::Date(raw.to_string()))
}

// ============================================================================
// Rank
// ============================================================================

pub const MAX_DAN: i32 = 10;
pub const MAX_KYU: i32 = 30;

/// Decode a rank tag: dan/pro ranks are positive, kyu ranks negative, and
/// anything undecodable is 0.
///
/// The digits before the first letter give the magnitude; the letter (`d`,
/// `p` or `k`, any case) gives the kind.
pub fn decode_rank(raw: &str) -> i32 {
    let Some((index, letter)) = raw.char_indices().find(|(_, c)| c.is_alphabetic()) else {
        return 0;
    };
    let Ok(magnitude) = raw[..index].trim().parse::<i32>() else {
        return 0;
    };

    match letter.to_lowercase().next() {
        Some('d') | Some('p') if (1..=MAX_DAN).contains(&magnitude) => magnitude,
        Some('k') if (1..=MAX_KYU).contains(&magnitude) => -magnitude,
        _ => 0,
    }
}

// ============================================================================
// Winner
// ============================================================================

/// `b` anywhere in the result means black won, else `w` means white won.
pub fn decode_winner(result: &str) -> Winner {
    let lower = result.to_lowercase();
    if lower.contains('b') {
        Winner::Black
    } else if lower.contains('w') {
        Winner::White
    } else {
        Winner::None
    }
}

// ============================================================================
// Handicap / board size
// ============================================================================

/// `Ok(None)` for an empty tag, the parsed stone count otherwise.
pub fn decode_handicap(raw: &str) -> Result<Option<i64>, DecodeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| DecodeError::Handicap(raw.to_string()))
}

pub fn decode_board_size(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

// ============================================================================
// Event
// ============================================================================

/// Decoded event tag.
///
/// ```text
///  Ordinal   Nationality   Base
///     1st    Japanese      Meijin
///    22nd    Chinese       Mingren
///     5th                  Asian TV Cup
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Country named by a nationality word, or `None`.
    pub country: Country,
    /// Ordinal of this edition (`33` for "33rd").
    pub number: u32,
    /// Series name without the ordinal ("Japanese Meijin").
    pub base_name: String,
    /// Full event name from the ordinal on ("1st Japanese Meijin").
    pub event_name: String,
}

fn ordinal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]{1,2})(?:st|nd|rd|th)(.*)").expect("static regex"))
}

fn nationality_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Japanese|Chinese|Korean|Taiwan").expect("static regex"))
}

pub fn decode_event(raw: &str) -> Result<EventInfo, DecodeError> {
    let undecodable = || DecodeError::EventOrdinal(raw.to_string());

    let caps = ordinal_regex().captures(raw).ok_or_else(undecodable)?;
    let whole = caps.get(0).ok_or_else(undecodable)?;
    let number = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(undecodable)?;
    let base_name = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();

    let country = nationality_regex()
        .find(&base_name)
        .and_then(|m| {
            NATIONALITY_WORDS
                .iter()
                .find(|(word, _)| *word == m.as_str())
                .map(|(_, country)| *country)
        })
        .unwrap_or(Country::None);

    Ok(EventInfo {
        country,
        number,
        base_name,
        event_name: whole.as_str().trim().to_string(),
    })
}
