//! SGF record trees for Kifu
//!
//! This crate turns the text of a game-record file into a typed tree:
//! a [`Collection`] of [`GameTree`]s, each holding a sequence of [`SgfNode`]s
//! and any number of variations.
//!
//! Downstream ingestion only ever walks the *main line* (see
//! [`GameTree::main_line`]): the tree's own nodes, then the main line of its
//! first variation. Alternative branches are kept in the AST but never
//! followed.

pub mod parser;

pub use parser::{parse_collection, SgfParseError, MAX_VARIATION_DEPTH};

use serde::{Deserialize, Serialize};

// ============================================================================
// AST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SgfProperty {
    /// Identifier as written in the file (`PB`, `DT`, legacy `PlayerBlack`, ...).
    pub ident: String,
    /// Unescaped values; never empty.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SgfNode {
    pub properties: Vec<SgfProperty>,
}

impl SgfNode {
    /// Values of the first property whose identifier is exactly `ident`.
    pub fn get(&self, ident: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|p| p.ident == ident)
            .map(|p| p.values.as_slice())
    }

    pub fn has(&self, ident: &str) -> bool {
        self.get(ident).is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameTree {
    pub nodes: Vec<SgfNode>,
    pub variations: Vec<GameTree>,
}

impl GameTree {
    /// Root node of this tree, if it has any nodes.
    pub fn root(&self) -> Option<&SgfNode> {
        self.nodes.first()
    }

    /// Iterate the main line: own nodes, then the first variation's main line.
    pub fn main_line(&self) -> MainLine<'_> {
        MainLine {
            tree: Some(self),
            index: 0,
        }
    }
}

/// Iterator over the "next" links of a game tree.
#[derive(Debug, Clone)]
pub struct MainLine<'a> {
    tree: Option<&'a GameTree>,
    index: usize,
}

impl<'a> Iterator for MainLine<'a> {
    type Item = &'a SgfNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let tree = self.tree?;
            if let Some(node) = tree.nodes.get(self.index) {
                self.index += 1;
                return Some(node);
            }
            self.tree = tree.variations.first();
            self.index = 0;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    pub games: Vec<GameTree>,
}

impl Collection {
    pub fn first_game(&self) -> Option<&GameTree> {
        self.games.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(ident: &str, value: &str) -> SgfNode {
        SgfNode {
            properties: vec![SgfProperty {
                ident: ident.to_string(),
                values: vec![value.to_string()],
            }],
        }
    }

    #[test]
    fn main_line_descends_into_first_variation_only() {
        let tree = GameTree {
            nodes: vec![node("B", "aa"), node("W", "bb")],
            variations: vec![
                GameTree {
                    nodes: vec![node("B", "cc")],
                    variations: vec![],
                },
                GameTree {
                    nodes: vec![node("B", "dd")],
                    variations: vec![],
                },
            ],
        };

        let seen: Vec<&str> = tree
            .main_line()
            .filter_map(|n| n.properties.first())
            .map(|p| p.values[0].as_str())
            .collect();
        assert_eq!(seen, vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn get_matches_identifier_exactly() {
        let n = node("PB", "Yamashita Keigo");
        assert_eq!(n.get("PB"), Some(&["Yamashita Keigo".to_string()][..]));
        assert!(n.get("pb").is_none());
        assert!(!n.has("PW"));
    }
}
