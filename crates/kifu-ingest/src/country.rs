//! Country reference data and the tables used to attribute events to a
//! host country.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed reference set of countries. The discriminant is the row id.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Country {
    #[default]
    None = 0,
    China = 1,
    Korea = 2,
    Japan = 3,
    Taiwan = 4,
}

impl Country {
    /// Seed order.
    pub const ALL: [Country; 5] = [
        Country::None,
        Country::China,
        Country::Korea,
        Country::Japan,
        Country::Taiwan,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn abbr(self) -> &'static str {
        match self {
            Country::None => "none",
            Country::China => "cn",
            Country::Korea => "kr",
            Country::Japan => "jp",
            Country::Taiwan => "tw",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Country::None => "None",
            Country::China => "China",
            Country::Korea => "Korea",
            Country::Japan => "Japan",
            Country::Taiwan => "Taiwan",
        }
    }

    /// Resolve an abbreviation; anything unrecognized is [`Country::None`].
    pub fn from_abbr(abbr: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.abbr() == abbr)
            .unwrap_or(Country::None)
    }

    /// Resolve a player's country tag. Records written in Japan often carry
    /// `ja` instead of `jp`.
    pub fn from_player_code(code: &str) -> Self {
        match code {
            "ja" => Country::Japan,
            other => Self::from_abbr(other),
        }
    }

    pub fn is_known(self) -> bool {
        self != Country::None
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

/// Nationality words that may appear in an event's base name.
pub const NATIONALITY_WORDS: [(&str, Country); 4] = [
    ("Japanese", Country::Japan),
    ("Chinese", Country::China),
    ("Korean", Country::Korea),
    ("Taiwan", Country::Taiwan),
];

/// Sponsor and venue keywords that identify a tournament's host country.
///
/// Searched in order, case-insensitively; the first hit wins, so more
/// specific keywords must come before broader ones.
pub const TOURNAMENT_KEYWORDS: [(&str, Country); 20] = [
    ("Samsung", Country::Korea),
    ("LG Cup", Country::Korea),
    ("Toyota", Country::Japan),
    ("Changqi", Country::China),
    ("Fujitsu", Country::Japan),
    ("Chunlan", Country::China),
    ("Nongshim", Country::Korea),
    ("Jeongganjang", Country::Korea),
    ("Zhonghuan", Country::Taiwan),
    ("Korea", Country::Japan),
    ("Nogshim", Country::Korea),
    ("Hungchang", Country::Korea),
    ("Kansai", Country::Japan),
    ("Hiroshima", Country::Japan),
    ("NHK", Country::Japan),
    ("Myeongin", Country::Korea),
    ("Haojue", Country::China),
    ("China", Country::China),
    ("Kangwon", Country::Korea),
    ("Daiwa-Shoken", Country::Japan),
];

/// Fallback attribution: scan [`TOURNAMENT_KEYWORDS`] for a keyword inside
/// `base_name`.
pub fn country_from_tournament_keywords(base_name: &str) -> Country {
    let haystack = base_name.to_lowercase();
    TOURNAMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| haystack.contains(&keyword.to_lowercase()))
        .map(|(_, country)| *country)
        .unwrap_or(Country::None)
}
