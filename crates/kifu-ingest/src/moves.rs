//! Stone colors, results and move coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Move property identifier for this color.
    pub fn ident(self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Who won a game, as far as the result tag tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Black,
    White,
    None,
}

impl Winner {
    /// Stable integer encoding used by the exported rows.
    pub fn as_i8(self) -> i8 {
        match self {
            Winner::Black => 1,
            Winner::White => -1,
            Winner::None => 0,
        }
    }
}

/// One move as two lowercase coordinate letters.
///
/// Coordinates are stored as read; range checks happen during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    x: char,
    y: char,
}

impl Move {
    pub const PASS: Move = Move { x: 't', y: 't' };

    pub fn new(x: char, y: char) -> Self {
        Self {
            x: lowercase(x),
            y: lowercase(y),
        }
    }

    /// Decode a raw move value: empty is a pass, two characters are a point,
    /// anything else is `None`.
    pub fn from_value(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (None, _, _) => Some(Self::PASS),
            (Some(x), Some(y), None) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    pub fn x(self) -> char {
        self.x
    }

    pub fn y(self) -> char {
        self.y
    }

    /// `t` lies off a 19×19 board on either axis, so it reads as a pass.
    pub fn is_pass(self) -> bool {
        self.x == 't' || self.y == 't'
    }

    /// Both coordinates within `a..=t`.
    pub fn in_range(self) -> bool {
        ('a'..='t').contains(&self.x) && ('a'..='t').contains(&self.y)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.x, self.y)
    }
}

fn lowercase(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Concatenate a move list into the compact string stored per game.
pub fn moves_string(moves: &[Move]) -> String {
    let mut out = String::with_capacity(moves.len() * 2);
    for m in moves {
        out.push(m.x);
        out.push(m.y);
    }
    out
}
