//! Compiled Grammar Import
//!
//! Entry point for loading an already-compiled grammar representation. The
//! template language itself is parsed and compiled elsewhere; this core only
//! validates the compiled form and resolves non-terminal table indices for
//! the expansion driver.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use tracing::{debug, info, instrument};

use crate::error::GrammarError;
use crate::slot::SlotConstraint;
use crate::symbol::NonTerminal;

/// One symbol on the right-hand side of a compiled production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompiledSymbol {
    NonTerminal {
        symbol: String,
    },
    Terminal {
        text: String,
    },
    Slot {
        name: String,
        #[serde(default)]
        constraint: SlotConstraint,
    },
    Choice {
        alternatives: Vec<String>,
    },
}

/// One compiled production: an expansion of `lhs` with a rule priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProduction {
    pub lhs: String,
    pub rhs: Vec<CompiledSymbol>,
    #[serde(default)]
    pub priority: f64,
}

/// A compiled grammar: declared non-terminals and their productions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledGrammar {
    pub nonterminals: Vec<String>,
    pub productions: Vec<CompiledProduction>,
}

impl CompiledGrammar {
    /// Import a compiled grammar from JSON.
    #[instrument(skip_all)]
    pub fn from_json_reader<R: io::Read>(reader: R) -> Result<Self, GrammarError> {
        let grammar: CompiledGrammar = serde_json::from_reader(reader)?;
        grammar.validate()?;
        info!(
            nonterminals = grammar.nonterminals.len(),
            productions = grammar.productions.len(),
            "Imported compiled grammar"
        );
        Ok(grammar)
    }

    /// Import a compiled grammar from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, GrammarError> {
        let grammar: CompiledGrammar = serde_json::from_str(text)?;
        grammar.validate()?;
        Ok(grammar)
    }

    /// Check internal consistency: every referenced non-terminal is declared
    /// exactly once, and every rule priority is finite.
    pub fn validate(&self) -> Result<(), GrammarError> {
        let mut declared = HashSet::new();
        for name in &self.nonterminals {
            if !declared.insert(name.as_str()) {
                return Err(GrammarError::DuplicateNonTerminal(name.clone()));
            }
        }

        for production in &self.productions {
            if !declared.contains(production.lhs.as_str()) {
                return Err(GrammarError::UnknownSymbol {
                    lhs: production.lhs.clone(),
                    symbol: production.lhs.clone(),
                });
            }
            if !production.priority.is_finite() {
                return Err(GrammarError::NonFinitePriority {
                    lhs: production.lhs.clone(),
                });
            }
            for symbol in &production.rhs {
                if let CompiledSymbol::NonTerminal { symbol } = symbol {
                    if !declared.contains(symbol.as_str()) {
                        return Err(GrammarError::UnknownSymbol {
                            lhs: production.lhs.clone(),
                            symbol: symbol.clone(),
                        });
                    }
                }
            }
        }

        debug!(
            nonterminals = self.nonterminals.len(),
            productions = self.productions.len(),
            "Validated compiled grammar"
        );
        Ok(())
    }

    /// Resolve declared non-terminals to [`NonTerminal`] references with
    /// table indices assigned in declaration order.
    pub fn resolve_nonterminals(&self) -> Vec<NonTerminal> {
        self.nonterminals
            .iter()
            .enumerate()
            .map(|(index, symbol)| NonTerminal::new(symbol.clone()).with_index(index))
            .collect()
    }
}
