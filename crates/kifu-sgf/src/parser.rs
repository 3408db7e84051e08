//! SGF text parser
//!
//! Grammar (FF[4], main-line tolerant):
//!
//! ```text
//! Collection = GameTree { GameTree }
//! GameTree   = "(" Sequence { GameTree } ")"
//! Sequence   = Node { Node }
//! Node       = ";" { Property }
//! Property   = Ident Value { Value }
//! Value      = "[" text "]"
//! ```
//!
//! Identifiers accept mixed-case ASCII letters so legacy FF[3] files parse;
//! callers decide how to normalize them.

use nom::{
    character::complete::{alpha1, char as pchar, multispace0},
    error::{Error as NomError, ErrorKind},
    multi::{many0, many1},
    sequence::terminated,
    IResult,
};
use thiserror::Error;

use crate::{Collection, GameTree, SgfNode, SgfProperty};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SgfParseError {
    #[error("no game tree found")]
    NoGameTree,
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("unexpected trailing input at byte {offset}")]
    TrailingInput { offset: usize },
}

/// Deepest variation nesting accepted. Trees are built and dropped
/// recursively, so deeper input is rejected as a syntax error.
pub const MAX_VARIATION_DEPTH: usize = 256;

/// Parse a full SGF document.
///
/// Anything before the first `(` is ignored (some archives prepend banners or
/// a byte-order mark).
pub fn parse_collection(text: &str) -> Result<Collection, SgfParseError> {
    let Some(start) = text.find('(') else {
        return Err(SgfParseError::NoGameTree);
    };

    match many1(terminated(|i| game_tree(i, 1), multispace0))(&text[start..]) {
        Ok((rest, games)) => {
            if rest.is_empty() {
                Ok(Collection { games })
            } else {
                Err(SgfParseError::TrailingInput {
                    offset: text.len() - rest.len(),
                })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(SgfParseError::Syntax {
            offset: text.len() - e.input.len(),
            message: describe(e.code),
        }),
        Err(nom::Err::Incomplete(_)) => Err(SgfParseError::Syntax {
            offset: text.len(),
            message: "unexpected end of input".to_string(),
        }),
    }
}

fn describe(code: ErrorKind) -> String {
    match code {
        ErrorKind::Char => "expected `(`, `)`, `;` or `]`".to_string(),
        ErrorKind::Many1 => "expected at least one node or value".to_string(),
        ErrorKind::Eof => "unterminated property value".to_string(),
        ErrorKind::TooLarge => "variation nesting too deep".to_string(),
        other => format!("{other:?}"),
    }
}

fn game_tree(input: &str, depth: usize) -> IResult<&str, GameTree> {
    let (rest, _) = pchar('(')(input)?;
    if depth > MAX_VARIATION_DEPTH {
        return Err(nom::Err::Failure(NomError::new(input, ErrorKind::TooLarge)));
    }
    let (input, _) = multispace0(rest)?;
    let (input, nodes) = many1(terminated(node, multispace0))(input)?;
    let (input, variations) =
        many0(terminated(|i| game_tree(i, depth + 1), multispace0))(input)?;
    let (input, _) = pchar(')')(input)?;
    Ok((input, GameTree { nodes, variations }))
}

fn node(input: &str) -> IResult<&str, SgfNode> {
    let (input, _) = pchar(';')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, properties) = many0(terminated(property, multispace0))(input)?;
    Ok((input, SgfNode { properties }))
}

fn property(input: &str) -> IResult<&str, SgfProperty> {
    let (input, ident) = alpha1(input)?;
    let (input, _) = multispace0(input)?;
    let (input, values) = many1(terminated(property_value, multispace0))(input)?;
    Ok((
        input,
        SgfProperty {
            ident: ident.to_string(),
            values,
        },
    ))
}

/// `[ ... ]` with `\` escaping the next character. An escaped line break is
/// a soft break and disappears from the value.
fn property_value(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = pchar('[')(input)?;
    let mut out = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(nom::Err::Failure(NomError::new(rest, ErrorKind::Eof))),
            Some(']') => return Ok((chars.as_str(), out)),
            Some('\\') => match chars.next() {
                None => return Err(nom::Err::Failure(NomError::new(rest, ErrorKind::Eof))),
                Some('\n') => {
                    if chars.as_str().starts_with('\r') {
                        chars.next();
                    }
                }
                Some('\r') => {
                    if chars.as_str().starts_with('\n') {
                        chars.next();
                    }
                }
                Some(c) => out.push(c),
            },
            Some(c) => out.push(c),
        }
        rest = chars.as_str();
    }
}
