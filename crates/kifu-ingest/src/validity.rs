//! Import-eligibility rules.
//!
//! Rules run in a fixed order and stop at the first failure. The verdict is
//! advisory: the corpus pipeline decides whether rejected records are still
//! imported.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decode::{decode_board_size, decode_date, decode_handicap, decode_rank};
use crate::extract::ExtractedRecord;
use crate::moves::{Color, Move};

pub const MIN_MOVES: usize = 30;
pub const EARLY_PASS_WINDOW: usize = 30;
pub const BOARD_SIZE: u32 = 19;
/// Highest coordinate letter on a 13×13 board.
const SMALL_BOARD_MAX: char = 'm';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rejection {
    BlankPlayerName,
    InvalidDate,
    Handicap,
    InvalidHandicap,
    TooFewMoves,
    BoardSizeTag,
    BoardSizeInferred,
    KyuRank,
    InvalidCoordinates,
    EarlyPass,
}

impl Rejection {
    pub fn label(self) -> &'static str {
        match self {
            Rejection::BlankPlayerName => "one or both players has blank name",
            Rejection::InvalidDate => "invalid date field",
            Rejection::Handicap => "handicap game",
            Rejection::InvalidHandicap => "invalid handicap",
            Rejection::TooFewMoves => "less than 30 moves",
            Rejection::BoardSizeTag => "board size not 19x19 (tag)",
            Rejection::BoardSizeInferred => "board size not 19x19 (inferred)",
            Rejection::KyuRank => "kyu rank",
            Rejection::InvalidCoordinates => "invalid coordinates",
            Rejection::EarlyPass => "pass within first 30 moves",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject(r) => Some(r),
        }
    }
}

type Rule = fn(&ExtractedRecord) -> Result<(), Rejection>;

/// Evaluation order matters: the first failing rule names the verdict.
const RULES: [Rule; 8] = [
    players_named,
    date_decodes,
    no_handicap,
    enough_moves,
    full_size_board,
    no_kyu_players,
    coordinates_in_range,
    no_early_pass,
];

pub fn check_validity(record: &ExtractedRecord) -> Verdict {
    match RULES.iter().try_for_each(|rule| rule(record)) {
        Ok(()) => Verdict::Accept,
        Err(rejection) => Verdict::Reject(rejection),
    }
}

fn players_named(record: &ExtractedRecord) -> Result<(), Rejection> {
    let tags = &record.tags;
    if tags.black_name.is_empty() || tags.white_name.is_empty() {
        return Err(Rejection::BlankPlayerName);
    }
    Ok(())
}

fn date_decodes(record: &ExtractedRecord) -> Result<(), Rejection> {
    decode_date(&record.tags.date)
        .map(|_| ())
        .map_err(|_| Rejection::InvalidDate)
}

fn no_handicap(record: &ExtractedRecord) -> Result<(), Rejection> {
    match decode_handicap(&record.tags.handicap) {
        Ok(None) | Ok(Some(0)) => Ok(()),
        Ok(Some(_)) => Err(Rejection::Handicap),
        Err(_) => Err(Rejection::InvalidHandicap),
    }
}

fn enough_moves(record: &ExtractedRecord) -> Result<(), Rejection> {
    if record.moves.len() < MIN_MOVES {
        return Err(Rejection::TooFewMoves);
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Board size
// ----------------------------------------------------------------------------

/// How the board size was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSizeEvidence {
    /// The size tag parsed to this value.
    Tag(u32),
    /// A move lies beyond the largest small-board coordinate.
    BeyondSmallBoard,
}

type BoardSizeAttempt = fn(&ExtractedRecord) -> Option<BoardSizeEvidence>;

/// Tried in order; the first attempt that yields evidence decides.
const BOARD_SIZE_ATTEMPTS: [BoardSizeAttempt; 2] = [board_size_from_tag, board_size_from_moves];

pub fn board_size_from_tag(record: &ExtractedRecord) -> Option<BoardSizeEvidence> {
    decode_board_size(&record.tags.board_size).map(BoardSizeEvidence::Tag)
}

/// Many records carry no size tag. A coordinate past `m` cannot occur on a
/// 13×13 board. `t` is skipped on either axis since it marks a pass.
pub fn board_size_from_moves(record: &ExtractedRecord) -> Option<BoardSizeEvidence> {
    let beyond = |c: char| c != 't' && c > SMALL_BOARD_MAX;
    record
        .moves
        .iter()
        .any(|m| beyond(m.x()) || beyond(m.y()))
        .then_some(BoardSizeEvidence::BeyondSmallBoard)
}

pub fn board_size_evidence(record: &ExtractedRecord) -> Option<BoardSizeEvidence> {
    BOARD_SIZE_ATTEMPTS.iter().find_map(|attempt| attempt(record))
}

fn full_size_board(record: &ExtractedRecord) -> Result<(), Rejection> {
    match board_size_evidence(record) {
        Some(BoardSizeEvidence::Tag(BOARD_SIZE)) => Ok(()),
        Some(BoardSizeEvidence::Tag(_)) => Err(Rejection::BoardSizeTag),
        Some(BoardSizeEvidence::BeyondSmallBoard) => Ok(()),
        None => Err(Rejection::BoardSizeInferred),
    }
}

// ----------------------------------------------------------------------------
// Players and moves
// ----------------------------------------------------------------------------

/// Undecodable ranks (0) are accepted; only kyu ranks are rejected.
fn no_kyu_players(record: &ExtractedRecord) -> Result<(), Rejection> {
    let kyu = |color| decode_rank(record.tags.player_rank(color)) < 0;
    if kyu(Color::Black) || kyu(Color::White) {
        return Err(Rejection::KyuRank);
    }
    Ok(())
}

fn coordinates_in_range(record: &ExtractedRecord) -> Result<(), Rejection> {
    if record.moves.iter().all(|m| m.in_range()) {
        Ok(())
    } else {
        Err(Rejection::InvalidCoordinates)
    }
}

fn no_early_pass(record: &ExtractedRecord) -> Result<(), Rejection> {
    if record
        .moves
        .iter()
        .take(EARLY_PASS_WINDOW)
        .any(|m: &Move| m.is_pass())
    {
        return Err(Rejection::EarlyPass);
    }
    Ok(())
}
