//! Grammar Symbols
//!
//! References used by the external expansion driver: [`NonTerminal`] names a
//! production table, [`Choice`] samples one of several literal terminals.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inert named reference to a non-terminal.
///
/// The index is assigned by the driver (or by
/// [`crate::grammar::CompiledGrammar::resolve_nonterminals`]) when the
/// production tables are built; it carries no derivation logic itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonTerminal {
    symbol: String,
    index: Option<usize>,
}

impl NonTerminal {
    pub fn new(symbol: impl Into<String>) -> Self {
        NonTerminal {
            symbol: symbol.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The driver-assigned table index, if assigned yet.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NT[{}]", self.symbol)
    }
}

/// An ordered set of literal terminal alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    alternatives: Vec<String>,
}

impl Choice {
    pub fn new(alternatives: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Choice {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Draw one alternative uniformly with the caller's random source.
    ///
    /// The generator is injected so that a seeded run is fully reproducible
    /// and parallel workers can use independent streams. Returns `None` only
    /// when the alternative set is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.alternatives.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.alternatives.len());
        Some(&self.alternatives[index])
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C[{}]", self.alternatives.join("|"))
    }
}
