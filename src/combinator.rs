//! Combinators
//!
//! A [`Combinator`] adapts a grammar author's semantic function into the
//! uniform operation the expansion driver invokes for every production:
//! given the rule's children and the rule priority, produce a new derivation
//! or reject the candidate. The driver can query [`Combinator::is_slot_fill`]
//! to distinguish slot-filling rules from generic combination rules when
//! choosing a pruning order.

use std::fmt;
use std::sync::Arc;

use crate::derivation::{Child, Derivation, ReplaceOptions, Replacement, SemanticArg};

/// Semantic function over the positional arguments of a generic combination.
pub type CombineAction<V> =
    dyn for<'a, 'b> Fn(&'a [SemanticArg<'b, V>]) -> Option<V> + Send + Sync;

/// Semantic function composing a derivation's value with a slot filler's
/// value (absent for terminal fillers).
pub type FillAction<V> = dyn Fn(&V, Option<&V>) -> Option<V> + Send + Sync;

/// Named boolean-property lookup on a composed semantic value.
///
/// The shape of the value is owned by each grammar author, so rule filters
/// treat it as an untyped, optional property lookup: an absent property
/// reads as false.
pub trait SemanticValue {
    fn flag(&self, _name: &str) -> Option<bool> {
        None
    }
}

/// A per-rule admissibility filter: a property name, optionally negated by a
/// leading `!`.
#[derive(Debug, Clone)]
struct Filter {
    property: String,
    negated: bool,
}

impl Filter {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('!') {
            Some(rest) => Filter {
                property: rest.to_string(),
                negated: true,
            },
            None => Filter {
                property: raw.to_string(),
                negated: false,
            },
        }
    }

    fn admits<V: SemanticValue>(&self, value: &V) -> bool {
        let holds = value.flag(&self.property).unwrap_or(false);
        holds != self.negated
    }
}

enum Op<V> {
    Combine {
        action: Arc<CombineAction<V>>,
        filter: Option<Filter>,
    },
    Fill {
        slot: String,
        action: Arc<FillAction<V>>,
        options: ReplaceOptions,
    },
}

/// A grammar rule's combination operation.
pub struct Combinator<V> {
    op: Op<V>,
}

/// A combinator that calls [`Derivation::combine`] and then, if `filter` is
/// given, rejects results whose value fails the named property check.
pub fn simple_combine<V>(action: Arc<CombineAction<V>>, filter: Option<&str>) -> Combinator<V> {
    Combinator {
        op: Op::Combine {
            action,
            filter: filter.map(Filter::parse),
        },
    }
}

/// A combinator that fills the slot named `slot` on its first child.
///
/// Requires exactly two children: a derivation carrying the slot, and a
/// terminal or derivation to fill it with.
pub fn combine_replace_placeholder<V>(
    slot: impl Into<String>,
    action: Arc<FillAction<V>>,
    options: ReplaceOptions,
) -> Combinator<V> {
    Combinator {
        op: Op::Fill {
            slot: slot.into(),
            action,
            options,
        },
    }
}

impl<V> Combinator<V> {
    /// True for slot-filling rules; the driver uses this to pick a search
    /// strategy per rule kind.
    pub fn is_slot_fill(&self) -> bool {
        matches!(self.op, Op::Fill { .. })
    }
}

impl<V: SemanticValue + Clone> Combinator<V> {
    /// Apply this combinator to a production's children.
    ///
    /// `None` is rejection; the caller discards the candidate and continues.
    pub fn apply(&self, children: &[Child<V>], rule_priority: f64) -> Option<Derivation<V>> {
        match &self.op {
            Op::Combine { action, filter } => {
                let result = Derivation::combine(children, action.as_ref(), rule_priority)?;
                if let Some(filter) = filter {
                    if !filter.admits(result.value()) {
                        return None;
                    }
                }
                Some(result)
            }
            Op::Fill {
                slot,
                action,
                options,
            } => {
                assert!(
                    children.len() == 2,
                    "slot-fill combinators take exactly two children"
                );
                let Child::Derivation(base) = &children[0] else {
                    panic!("slot-fill combinators require a derivation as their first child");
                };
                let replacement = match &children[1] {
                    Child::Terminal(text) => Replacement::Terminal(text.as_str()),
                    Child::Derivation(inner) => Replacement::Derivation(inner),
                    Child::Slot(_) | Child::Context(_) => {
                        panic!(
                            "slot-fill combinators require a terminal or derivation \
                             as their second child"
                        )
                    }
                };
                base.replace_placeholder(
                    slot,
                    replacement,
                    action.as_ref(),
                    *options,
                    rule_priority,
                )
            }
        }
    }
}

impl<V> Clone for Combinator<V> {
    fn clone(&self) -> Self {
        let op = match &self.op {
            Op::Combine { action, filter } => Op::Combine {
                action: Arc::clone(action),
                filter: filter.clone(),
            },
            Op::Fill {
                slot,
                action,
                options,
            } => Op::Fill {
                slot: slot.clone(),
                action: Arc::clone(action),
                options: *options,
            },
        };
        Combinator { op }
    }
}

impl<V> fmt::Debug for Combinator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            Op::Combine { filter, .. } => f
                .debug_struct("Combinator::Combine")
                .field("filter", filter)
                .finish_non_exhaustive(),
            Op::Fill { slot, options, .. } => f
                .debug_struct("Combinator::Fill")
                .field("slot", slot)
                .field("options", options)
                .finish_non_exhaustive(),
        }
    }
}
