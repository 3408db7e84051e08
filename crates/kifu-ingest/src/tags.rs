//! The fixed tag vocabulary pulled out of every record.

use serde::{Deserialize, Serialize};

use crate::moves::Color;

/// The 14 record tags the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKey {
    BoardSize,
    Handicap,
    WhiteName,
    WhiteRank,
    WhiteCountry,
    BlackName,
    BlackRank,
    BlackCountry,
    Event,
    Round,
    Date,
    Place,
    Komi,
    Result,
}

impl TagKey {
    pub const ALL: [TagKey; 14] = [
        TagKey::BoardSize,
        TagKey::Handicap,
        TagKey::WhiteName,
        TagKey::WhiteRank,
        TagKey::WhiteCountry,
        TagKey::BlackName,
        TagKey::BlackRank,
        TagKey::BlackCountry,
        TagKey::Event,
        TagKey::Round,
        TagKey::Date,
        TagKey::Place,
        TagKey::Komi,
        TagKey::Result,
    ];

    /// Property identifier in the record format.
    pub fn ident(self) -> &'static str {
        match self {
            TagKey::BoardSize => "SZ",
            TagKey::Handicap => "HA",
            TagKey::WhiteName => "PW",
            TagKey::WhiteRank => "WR",
            TagKey::WhiteCountry => "WC",
            TagKey::BlackName => "PB",
            TagKey::BlackRank => "BR",
            TagKey::BlackCountry => "BC",
            TagKey::Event => "EV",
            TagKey::Round => "RO",
            TagKey::Date => "DT",
            TagKey::Place => "PC",
            TagKey::Komi => "KM",
            TagKey::Result => "RE",
        }
    }

    /// Look up an (already uppercased) property identifier.
    pub fn from_ident(ident: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.ident() == ident)
    }
}

/// Extracted metadata for one record. Missing tags are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    pub board_size: String,
    pub handicap: String,
    pub white_name: String,
    pub white_rank: String,
    pub white_country: String,
    pub black_name: String,
    pub black_rank: String,
    pub black_country: String,
    pub event: String,
    pub round: String,
    pub date: String,
    pub place: String,
    pub komi: String,
    pub result: String,
}

impl TagSet {
    pub fn get(&self, key: TagKey) -> &str {
        match key {
            TagKey::BoardSize => &self.board_size,
            TagKey::Handicap => &self.handicap,
            TagKey::WhiteName => &self.white_name,
            TagKey::WhiteRank => &self.white_rank,
            TagKey::WhiteCountry => &self.white_country,
            TagKey::BlackName => &self.black_name,
            TagKey::BlackRank => &self.black_rank,
            TagKey::BlackCountry => &self.black_country,
            TagKey::Event => &self.event,
            TagKey::Round => &self.round,
            TagKey::Date => &self.date,
            TagKey::Place => &self.place,
            TagKey::Komi => &self.komi,
            TagKey::Result => &self.result,
        }
    }

    pub(crate) fn slot_mut(&mut self, key: TagKey) -> &mut String {
        match key {
            TagKey::BoardSize => &mut self.board_size,
            TagKey::Handicap => &mut self.handicap,
            TagKey::WhiteName => &mut self.white_name,
            TagKey::WhiteRank => &mut self.white_rank,
            TagKey::WhiteCountry => &mut self.white_country,
            TagKey::BlackName => &mut self.black_name,
            TagKey::BlackRank => &mut self.black_rank,
            TagKey::BlackCountry => &mut self.black_country,
            TagKey::Event => &mut self.event,
            TagKey::Round => &mut self.round,
            TagKey::Date => &mut self.date,
            TagKey::Place => &mut self.place,
            TagKey::Komi => &mut self.komi,
            TagKey::Result => &mut self.result,
        }
    }

    pub fn player_name(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black_name,
            Color::White => &self.white_name,
        }
    }

    pub fn player_rank(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black_rank,
            Color::White => &self.white_rank,
        }
    }

    pub fn player_country(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black_country,
            Color::White => &self.white_country,
        }
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips_through_its_ident() {
        for key in TagKey::ALL {
            assert_eq!(TagKey::from_ident(key.ident()), Some(key));
        }
        assert_eq!(TagKey::from_ident("GM"), None);
        assert_eq!(TagKey::from_ident("pb"), None);
    }

    #[test]
    fn slots_are_distinct() {
        let mut tags = TagSet::default();
        for key in TagKey::ALL {
            *tags.slot_mut(key) = key.ident().to_string();
        }
        for key in TagKey::ALL {
            assert_eq!(tags.get(key), key.ident());
        }
        assert_eq!(tags.player_name(Color::Black), "PB");
        assert_eq!(tags.player_rank(Color::White), "WR");
        assert_eq!(tags.player_country(Color::Black), "BC");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(collapse_whitespace("  Nihon   Ki-In,\n Tokyo "), "Nihon Ki-In, Tokyo");
        assert_eq!(collapse_whitespace(""), "");
    }
}
