//! Derivations
//!
//! A [`Derivation`] represents a sentence candidate, possibly with unfilled
//! slots, together with the semantic value composed at this point of the
//! derivation tree, the dialogue context it originates from, and an additive
//! search priority.
//!
//! Derivations are immutable once shared: [`Derivation::combine`] and
//! [`Derivation::replace_placeholder`] build new instances, sharing the token
//! sequences of their inputs. Both return `None` to signal **rejection**, an
//! expected, frequent outcome the driver silently discards, and reserve
//! panics for contract violations (non-finite priorities, combining across
//! incompatible contexts), which indicate grammar or driver bugs.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use tracing::trace;

use crate::context::Context;
use crate::sequence::Sequence;
use crate::slot::{Slot, SlotConstraint};

/// One element of a built token sequence.
///
/// Sub-derivations never appear here: a derivation child's sequence is
/// concatenated into the output at combination time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal terminal word.
    Terminal(String),
    /// An unfilled slot.
    Slot(Slot),
}

impl Token {
    pub fn is_slot(&self) -> bool {
        matches!(self, Token::Slot(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Terminal(text) => f.write_str(text),
            Token::Slot(slot) => write!(f, "{slot}"),
        }
    }
}

/// One child of a grammar-rule application, as presented to a combinator.
#[derive(Debug, Clone)]
pub enum Child<V> {
    Terminal(String),
    Slot(Slot),
    /// Sets the running context; contributes its info to the semantic action
    /// and nothing to the output sequence.
    Context(Context),
    Derivation(Derivation<V>),
}

/// One positional argument to a semantic action.
pub enum SemanticArg<'a, V> {
    /// The composed value of a derivation child.
    Value(&'a V),
    /// The public info of a context child.
    Info(&'a (dyn Any + Send + Sync)),
    /// A terminal or slot child; no value at this position.
    Hole,
}

impl<'a, V> SemanticArg<'a, V> {
    pub fn value(&self) -> Option<&'a V> {
        match self {
            SemanticArg::Value(value) => Some(*value),
            _ => None,
        }
    }

    pub fn info(&self) -> Option<&'a (dyn Any + Send + Sync)> {
        match self {
            SemanticArg::Info(info) => Some(*info),
            _ => None,
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, SemanticArg::Hole)
    }
}

// Only references inside; copyable regardless of `V`.
impl<V> Clone for SemanticArg<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for SemanticArg<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for SemanticArg<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticArg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            SemanticArg::Info(_) => f.write_str("Info(..)"),
            SemanticArg::Hole => f.write_str("Hole"),
        }
    }
}

/// What a slot is filled with.
#[derive(Debug)]
pub enum Replacement<'a, V> {
    /// A literal terminal.
    Terminal(&'a str),
    /// A (usually complete) sub-derivation.
    Derivation(&'a Derivation<V>),
}

impl<V> Clone for Replacement<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Replacement<'_, V> {}

/// Caller-side markers consulted by slot constraint checks.
///
/// `is_undefined` marks the replacement as the caller's undefined-value
/// sentinel, which is distinct from both "no replacement" and a legitimate
/// domain value; `is_constant` marks it as a constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceOptions {
    pub is_constant: bool,
    pub is_undefined: bool,
}

/// An immutable sentence candidate with composed value, context and priority.
pub struct Derivation<V> {
    value: V,
    context: Option<Context>,
    sequence: Sequence<Token>,
    priority: f64,
    // Memoized pure functions of `sequence`; recomputation is idempotent, so
    // concurrent readers may race on first access.
    flat: OnceLock<String>,
    has_slots: OnceLock<bool>,
}

impl<V> Derivation<V> {
    /// Construct a derivation directly.
    ///
    /// Panics if `priority` is not finite.
    pub fn new(value: V, sequence: Sequence<Token>, context: Option<Context>, priority: f64) -> Self {
        assert!(priority.is_finite(), "derivation priority must be finite");
        Derivation {
            value,
            context,
            sequence,
            priority,
            flat: OnceLock::new(),
            has_slots: OnceLock::new(),
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn sequence(&self) -> &Sequence<Token> {
        &self.sequence
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Replace the composed value. Only meaningful on a fresh clone that has
    /// not been shared yet.
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// Replace the priority. Panics if not finite.
    pub fn set_priority(&mut self, priority: f64) {
        assert!(priority.is_finite(), "derivation priority must be finite");
        self.priority = priority;
    }

    /// Add to the priority. Panics if the result is not finite.
    pub fn add_priority(&mut self, delta: f64) {
        self.set_priority(self.priority + delta);
    }

    /// True iff no slot remains anywhere in the sequence.
    ///
    /// Only complete derivations are eligible to be emitted as finished
    /// generation output.
    pub fn complete(&self) -> bool {
        !*self
            .has_slots
            .get_or_init(|| self.sequence.iter().any(Token::is_slot))
    }

    /// True if a slot named `symbol` occurs anywhere in the sequence.
    pub fn has_slot(&self, symbol: &str) -> bool {
        self.sequence
            .iter()
            .any(|token| matches!(token, Token::Slot(slot) if slot.symbol() == symbol))
    }

    /// Space-joined rendering of the token stream; slots render as
    /// `${name}`.
    pub fn flattened(&self) -> &str {
        self.flat.get_or_init(|| {
            let mut out = String::new();
            for token in self.sequence.iter() {
                if !out.is_empty() {
                    out.push(' ');
                }
                match token {
                    Token::Terminal(text) => out.push_str(text),
                    Token::Slot(slot) => out.push_str(&slot.to_string()),
                }
            }
            out
        })
    }
}

impl<V: Clone> Derivation<V> {
    /// Build a derivation from an ordered list of rule children.
    ///
    /// Scans the children in order: a [`Child::Context`] overrides the
    /// running context and contributes its info as that position's argument;
    /// terminals and slots append themselves to the output and contribute
    /// [`SemanticArg::Hole`]; a derivation contributes its value, adds its
    /// priority, and has its sequence concatenated into the output.
    ///
    /// Returns `None` (rejection) when the semantic action judges the
    /// combination inadmissible. Panics if two children carry distinct
    /// present contexts, or if a sole child is a context.
    pub fn combine<F>(children: &[Child<V>], semantic_action: F, rule_priority: f64) -> Option<Self>
    where
        F: Fn(&[SemanticArg<'_, V>]) -> Option<V>,
    {
        assert!(rule_priority.is_finite(), "rule priority must be finite");

        if let [child] = children {
            return match child {
                Child::Context(_) => {
                    panic!("a context cannot be the sole child of a combination")
                }
                Child::Derivation(inner) => {
                    let Some(value) = semantic_action(&[SemanticArg::Value(inner.value())]) else {
                        trace!("combination rejected by semantic action");
                        return None;
                    };
                    let mut derived = inner.clone();
                    derived.set_value(value);
                    derived.add_priority(rule_priority);
                    Some(derived)
                }
                Child::Terminal(text) => Self::combine_leaf(
                    Token::Terminal(text.clone()),
                    &semantic_action,
                    rule_priority,
                ),
                Child::Slot(slot) => Self::combine_leaf(
                    Token::Slot(slot.clone()),
                    &semantic_action,
                    rule_priority,
                ),
            };
        }

        let mut sequence = Sequence::empty();
        let mut args: Vec<SemanticArg<'_, V>> = Vec::with_capacity(children.len());
        let mut context: Option<Context> = None;
        let mut priority = rule_priority;

        for child in children {
            match child {
                Child::Context(ctx) => {
                    // Does not go into the output sequence.
                    context = Some(ctx.clone());
                    args.push(SemanticArg::Info(ctx.info()));
                }
                Child::Terminal(text) => {
                    args.push(SemanticArg::Hole);
                    sequence = sequence.append(Token::Terminal(text.clone()));
                }
                Child::Slot(slot) => {
                    args.push(SemanticArg::Hole);
                    sequence = sequence.append(Token::Slot(slot.clone()));
                }
                Child::Derivation(inner) => {
                    assert!(
                        Context::compatible(context.as_ref(), inner.context()),
                        "cannot combine derivations from incompatible contexts"
                    );
                    context = Context::meet(context, inner.context().cloned());
                    priority += inner.priority();
                    args.push(SemanticArg::Value(inner.value()));
                    sequence = Sequence::concat(&sequence, inner.sequence());
                }
            }
        }

        let Some(value) = semantic_action(&args) else {
            trace!("combination rejected by semantic action");
            return None;
        };
        Some(Derivation::new(value, sequence, context, priority))
    }

    fn combine_leaf<F>(token: Token, semantic_action: &F, rule_priority: f64) -> Option<Self>
    where
        F: Fn(&[SemanticArg<'_, V>]) -> Option<V>,
    {
        let Some(value) = semantic_action(&[SemanticArg::Hole]) else {
            trace!("combination rejected by semantic action");
            return None;
        };
        Some(Derivation::new(
            value,
            Sequence::singleton(token),
            None,
            rule_priority,
        ))
    }

    /// Fill every occurrence of the slot named `symbol` with `replacement`.
    ///
    /// The new value is `semantic_action(self.value, replacement_value)`,
    /// where the replacement value is absent for terminal replacements.
    /// Rejects (returns `None`) when the semantic action declines, when the
    /// named slot does not occur in the sequence, or when any matching slot's
    /// constraint fails against `options`. A missing slot is a routine
    /// outcome: the same combinator is tried against derivations that may or
    /// may not carry the slot.
    ///
    /// Panics if a replacement derivation's context is incompatible with this
    /// derivation's context.
    pub fn replace_placeholder<F>(
        &self,
        symbol: &str,
        replacement: Replacement<'_, V>,
        semantic_action: F,
        options: ReplaceOptions,
        rule_priority: f64,
    ) -> Option<Self>
    where
        F: Fn(&V, Option<&V>) -> Option<V>,
    {
        assert!(rule_priority.is_finite(), "rule priority must be finite");

        let new_value = match replacement {
            Replacement::Terminal(_) => semantic_action(&self.value, None),
            Replacement::Derivation(inner) => {
                assert!(
                    Context::compatible(self.context(), inner.context()),
                    "cannot fill a slot across incompatible contexts"
                );
                semantic_action(&self.value, Some(inner.value()))
            }
        };
        let Some(new_value) = new_value else {
            trace!(slot = symbol, "slot fill rejected by semantic action");
            return None;
        };

        let mut sequence = Sequence::empty();
        let mut context = self.context.clone();
        let mut priority = self.priority + rule_priority;
        let mut found = false;
        let mut bad = false;

        for token in self.sequence.iter() {
            match token {
                Token::Slot(slot) if slot.symbol() == symbol => {
                    match slot.constraint() {
                        SlotConstraint::NoUndefined if options.is_undefined => bad = true,
                        SlotConstraint::ConstantOnly
                            if !options.is_constant && !options.is_undefined =>
                        {
                            bad = true
                        }
                        _ => {}
                    }
                    match replacement {
                        Replacement::Derivation(inner) => {
                            sequence = Sequence::concat(&sequence, inner.sequence());
                            context = Context::meet(context, inner.context().cloned());
                            priority += inner.priority();
                        }
                        Replacement::Terminal(text) => {
                            sequence = sequence.append(Token::Terminal(text.to_string()));
                        }
                    }
                    found = true;
                }
                other => sequence = sequence.append(other.clone()),
            }
        }

        if !found || bad {
            trace!(slot = symbol, found, "slot fill rejected");
            return None;
        }
        Some(Derivation::new(new_value, sequence, context, priority))
    }
}

impl<V: Clone> Clone for Derivation<V> {
    /// Cheap clone sharing the sequence and context; the clone's value and
    /// priority are independently settable.
    fn clone(&self) -> Self {
        Derivation {
            value: self.value.clone(),
            context: self.context.clone(),
            sequence: self.sequence.clone(),
            priority: self.priority,
            flat: self.flat.clone(),
            has_slots: self.has_slots.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Derivation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derivation")
            .field("value", &self.value)
            .field("context", &self.context)
            .field("priority", &self.priority)
            .field("tokens", &self.sequence.len())
            .finish()
    }
}

impl<V> fmt::Display for Derivation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flattened())
    }
}
