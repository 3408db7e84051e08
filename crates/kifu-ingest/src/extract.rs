//! Tag and move extraction from a parsed record tree.
//!
//! Only the main line is walked. Each known tag keeps the first value seen
//! along that line; moves must strictly alternate starting with black.

use kifu_sgf::{parse_collection, GameTree, SgfParseError};
use std::collections::HashSet;
use thiserror::Error;

use crate::moves::{Color, Move};
use crate::tags::{collapse_whitespace, TagKey, TagSet};

/// Tags plus the main-line move sequence of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub tags: TagSet,
    pub moves: Vec<Move>,
}

/// Any of these makes a record unparseable; the corpus scan skips it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("record syntax: {0}")]
    Syntax(#[from] SgfParseError),
    #[error("collection holds no game")]
    NoGame,
    #[error("property {ident} has no value")]
    EmptyProperty { ident: String },
    #[error("move {number}: expected a {expected} move")]
    ColorMismatch { number: usize, expected: Color },
    #[error("move {number}: invalid move value {value:?}")]
    InvalidMove { number: usize, value: String },
}

/// Parse record text and extract its first game.
pub fn extract_text(text: &str) -> Result<ExtractedRecord, ExtractError> {
    let collection = parse_collection(text)?;
    let game = collection.first_game().ok_or(ExtractError::NoGame)?;
    extract_record(game)
}

pub fn extract_record(game: &GameTree) -> Result<ExtractedRecord, ExtractError> {
    let mut record = ExtractedRecord::default();
    let mut assigned: HashSet<TagKey> = HashSet::new();
    let mut expected = Color::Black;

    for node in game.main_line() {
        for prop in &node.properties {
            let Some(key) = TagKey::from_ident(&prop.ident.to_uppercase()) else {
                continue;
            };
            if !assigned.insert(key) {
                continue;
            }
            let value = prop
                .values
                .first()
                .ok_or_else(|| ExtractError::EmptyProperty {
                    ident: prop.ident.clone(),
                })?;
            *record.tags.slot_mut(key) = collapse_whitespace(value);
        }

        if !node.has(Color::Black.ident()) && !node.has(Color::White.ident()) {
            continue;
        }

        let number = record.moves.len() + 1;
        let values = node
            .get(expected.ident())
            .ok_or(ExtractError::ColorMismatch { number, expected })?;
        let value = values.first().ok_or_else(|| ExtractError::EmptyProperty {
            ident: expected.ident().to_string(),
        })?;
        let mv = Move::from_value(value).ok_or_else(|| ExtractError::InvalidMove {
            number,
            value: value.clone(),
        })?;

        record.moves.push(mv);
        expected = expected.opposite();
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::moves_string;

    #[test]
    fn extracts_tags_and_moves() {
        let record = extract_text(
            "(;SZ[19]PB[Yamashita  Keigo]BR[9d]PW[Kono Rin]WR[9d]EV[33rd Tengen]
              DT[2007-07-19]RE[B+R];B[qd];W[dc];B[PQ])",
        )
        .expect("extract");

        assert_eq!(record.tags.board_size, "19");
        assert_eq!(record.tags.black_name, "Yamashita Keigo");
        assert_eq!(record.tags.white_name, "Kono Rin");
        assert_eq!(record.tags.event, "33rd Tengen");
        assert_eq!(record.tags.result, "B+R");
        assert_eq!(record.tags.komi, "");
        assert_eq!(moves_string(&record.moves), "qddcpq");
    }

    #[test]
    fn empty_move_value_is_a_pass() {
        let record = extract_text("(;B[aa];W[];B[bb])").expect("extract");
        let moves: Vec<String> = record.moves.iter().map(ToString::to_string).collect();
        assert_eq!(moves, vec!["aa", "tt", "bb"]);
    }

    #[test]
    fn first_occurrence_of_a_tag_wins() {
        let record = extract_text("(;PB[First];B[aa]PB[Second];W[bb])").expect("extract");
        assert_eq!(record.tags.black_name, "First");
    }

    #[test]
    fn lowercase_tag_identifiers_are_recognized() {
        let record = extract_text("(;pb[Cho Chikun]Ev[1st Japanese Meijin])").expect("extract");
        assert_eq!(record.tags.black_name, "Cho Chikun");
        assert_eq!(record.tags.event, "1st Japanese Meijin");
    }

    #[test]
    fn tag_only_nodes_do_not_advance_the_color() {
        let record = extract_text("(;PB[x];B[aa];C[comment];W[bb];B[cc])").expect("extract");
        assert_eq!(record.moves.len(), 3);
    }

    #[test]
    fn color_out_of_turn_is_rejected() {
        let err = extract_text("(;B[aa];B[bb])").expect_err("should fail");
        assert_eq!(
            err,
            ExtractError::ColorMismatch {
                number: 2,
                expected: Color::White
            }
        );
    }

    #[test]
    fn white_first_is_rejected() {
        let err = extract_text("(;W[aa])").expect_err("should fail");
        assert_eq!(
            err,
            ExtractError::ColorMismatch {
                number: 1,
                expected: Color::Black
            }
        );
    }

    #[test]
    fn overlong_move_value_is_rejected() {
        let err = extract_text("(;B[aa];W[bbb])").expect_err("should fail");
        assert_eq!(
            err,
            ExtractError::InvalidMove {
                number: 2,
                value: "bbb".to_string()
            }
        );
    }

    #[test]
    fn variations_are_ignored() {
        let record = extract_text("(;B[aa](;W[bb])(;B[cc];B[dd]))").expect("extract");
        assert_eq!(moves_string(&record.moves), "aabb");
    }

    #[test]
    fn syntax_errors_surface_as_extract_errors() {
        let err = extract_text("(;B[aa]").expect_err("should fail");
        assert!(matches!(err, ExtractError::Syntax(_)), "err={err}");
    }

    #[test]
    fn empty_tree_extracts_nothing() {
        let record = extract_record(&GameTree::default());
        assert_eq!(record, Ok(ExtractedRecord::default()));
    }
}
