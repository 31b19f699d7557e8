//! Integration tests for slot filling

use std::sync::Arc;

use weave::combinator::combine_replace_placeholder;
use weave::derivation::{Child, Derivation, ReplaceOptions, Replacement, Token};
use weave::sequence::Sequence;
use weave::slot::{Slot, SlotConstraint};

use super::support::{leaf, with_slot, TestValue};

fn add_action(a: &TestValue, b: Option<&TestValue>) -> Option<TestValue> {
    Some(TestValue::of(a.total + b.map_or(0, |v| v.total)))
}

/// Test that filling a slot splices the replacement's token stream in place.
#[test]
fn test_fill_with_derivation_splices_tokens() {
    let base = with_slot(Slot::new("x"), &["y"], 1);
    let filler = leaf("z", 5, 0.0);
    let result = base
        .replace_placeholder(
            "x",
            Replacement::Derivation(&filler),
            add_action,
            ReplaceOptions::default(),
            0.0,
        )
        .unwrap();
    assert_eq!(result.flattened(), "z y");
    assert_eq!(result.value().total, 6);
    assert!(result.complete());
    assert!(!result.has_slot("x"));
}

/// Test that filling with a terminal inserts the literal.
#[test]
fn test_fill_with_terminal() {
    let base = with_slot(Slot::new("song"), &["please"], 3);
    let result = base
        .replace_placeholder(
            "song",
            Replacement::Terminal("daydreaming"),
            add_action,
            ReplaceOptions::default(),
            1.0,
        )
        .unwrap();
    assert_eq!(result.flattened(), "daydreaming please");
    assert_eq!(result.value().total, 3);
    assert_eq!(result.priority(), 1.0);
}

/// Test that a missing slot rejects rather than erroring: the same
/// combinator is routinely tried against derivations lacking the slot.
#[test]
fn test_missing_slot_rejects() {
    let base = leaf("plain", 1, 0.0);
    assert!(base
        .replace_placeholder(
            "x",
            Replacement::Terminal("z"),
            add_action,
            ReplaceOptions::default(),
            0.0,
        )
        .is_none());
}

/// Test that a constant-only slot rejects a non-constant replacement and
/// accepts a constant or the undefined-value marker.
#[test]
fn test_constant_only_constraint() {
    let base = with_slot(
        Slot::with_constraint("x", SlotConstraint::ConstantOnly),
        &[],
        0,
    );
    let plain = ReplaceOptions::default();
    let constant = ReplaceOptions {
        is_constant: true,
        is_undefined: false,
    };
    let undefined = ReplaceOptions {
        is_constant: false,
        is_undefined: true,
    };

    assert!(base
        .replace_placeholder("x", Replacement::Terminal("v"), add_action, plain, 0.0)
        .is_none());
    assert!(base
        .replace_placeholder("x", Replacement::Terminal("v"), add_action, constant, 0.0)
        .is_some());
    assert!(base
        .replace_placeholder("x", Replacement::Terminal("v"), add_action, undefined, 0.0)
        .is_some());
}

/// Test that a no-undefined slot rejects the undefined-value marker.
#[test]
fn test_no_undefined_constraint() {
    let base = with_slot(
        Slot::with_constraint("x", SlotConstraint::NoUndefined),
        &[],
        0,
    );
    let undefined = ReplaceOptions {
        is_constant: false,
        is_undefined: true,
    };
    assert!(base
        .replace_placeholder("x", Replacement::Terminal("v"), add_action, undefined, 0.0)
        .is_none());
    assert!(base
        .replace_placeholder(
            "x",
            Replacement::Terminal("v"),
            add_action,
            ReplaceOptions::default(),
            0.0,
        )
        .is_some());
}

/// Test priority accumulation across base, rule, and filler.
#[test]
fn test_fill_priority_accumulation() {
    let sequence = Sequence::singleton(Token::Terminal("find".to_string()))
        .append(Token::Slot(Slot::new("query")));
    let base = Derivation::new(TestValue::of(0), sequence, None, 4.0);
    let filler = leaf("cats", 1, 2.5);
    let result = base
        .replace_placeholder(
            "query",
            Replacement::Derivation(&filler),
            add_action,
            ReplaceOptions::default(),
            1.0,
        )
        .unwrap();
    assert_eq!(result.priority(), 7.5);
    assert_eq!(result.flattened(), "find cats");
}

/// Test the slot-fill combinator end to end, including its driver-visible
/// tag.
#[test]
fn test_fill_combinator_applies() {
    let combinator = combine_replace_placeholder(
        "query",
        Arc::new(add_action),
        ReplaceOptions::default(),
    );
    assert!(combinator.is_slot_fill());

    let base = with_slot(Slot::new("query"), &["today"], 1);
    let filler = leaf("weather", 2, 0.0);
    let result = combinator
        .apply(
            &[Child::Derivation(base.clone()), Child::Derivation(filler)],
            0.5,
        )
        .unwrap();
    assert_eq!(result.flattened(), "weather today");
    assert_eq!(result.value().total, 3);

    // The same combinator rejects a base without the slot.
    let plain = leaf("nothing", 0, 0.0);
    assert!(combinator
        .apply(
            &[Child::Derivation(plain), Child::Terminal("x".to_string())],
            0.0,
        )
        .is_none());
}
