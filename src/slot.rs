//! Slots
//!
//! A slot is a named, optionally constrained, unfilled position within a
//! derivation's token sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraint on what a slot accepts when filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotConstraint {
    #[default]
    Unconstrained,
    /// Only constants (or the undefined-value marker) may fill this slot.
    ConstantOnly,
    /// The undefined-value marker may not fill this slot.
    NoUndefined,
}

/// A named unfilled position in a token sequence.
///
/// Immutable value object; many derivations may reference identical slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    symbol: String,
    #[serde(default)]
    constraint: SlotConstraint,
}

impl Slot {
    pub fn new(symbol: impl Into<String>) -> Self {
        Slot {
            symbol: symbol.into(),
            constraint: SlotConstraint::Unconstrained,
        }
    }

    pub fn with_constraint(symbol: impl Into<String>, constraint: SlotConstraint) -> Self {
        Slot {
            symbol: symbol.into(),
            constraint,
        }
    }

    /// The grammar symbol naming this gap.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn constraint(&self) -> SlotConstraint {
        self.constraint
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}}}", self.symbol)
    }
}
