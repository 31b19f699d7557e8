//! Integration tests for context compatibility across combination

use weave::context::Context;
use weave::derivation::{Child, Derivation, ReplaceOptions, Replacement, Token};
use weave::sequence::Sequence;
use weave::slot::Slot;

use super::support::TestValue;

fn tagged(text: &str, ctx: &Context) -> Derivation<TestValue> {
    Derivation::new(
        TestValue::of(1),
        Sequence::singleton(Token::Terminal(text.to_string())),
        Some(ctx.clone()),
        0.0,
    )
}

/// Test that fragments from the same context combine and keep that context.
#[test]
fn test_same_context_combines() {
    let ctx = Context::new((), ());
    let result = Derivation::combine(
        &[
            Child::Derivation(tagged("a", &ctx)),
            Child::Derivation(tagged("b", &ctx)),
        ],
        |_| Some(TestValue::of(0)),
        0.0,
    )
    .unwrap();
    assert_eq!(result.context(), Some(&ctx));
}

/// Test that a context-free fragment combines into a tagged one, inheriting
/// the tag (meet is left-biased toward the present side).
#[test]
fn test_absent_context_is_compatible() {
    let ctx = Context::new((), ());
    let free = Derivation::new(
        TestValue::of(1),
        Sequence::singleton(Token::Terminal("free".to_string())),
        None,
        0.0,
    );
    let result = Derivation::combine(
        &[Child::Derivation(free), Child::Derivation(tagged("tied", &ctx))],
        |_| Some(TestValue::of(0)),
        0.0,
    )
    .unwrap();
    assert_eq!(result.context(), Some(&ctx));
}

/// Test that combining across two distinct dialogue states is a driver bug
/// and fails fast.
#[test]
#[should_panic(expected = "incompatible contexts")]
fn test_distinct_contexts_are_fatal() {
    let c1 = Context::new((), ());
    let c2 = Context::new((), ());
    let _ = Derivation::combine(
        &[
            Child::Derivation(tagged("a", &c1)),
            Child::Derivation(tagged("b", &c2)),
        ],
        |_| Some(TestValue::of(0)),
        0.0,
    );
}

/// Test that slot filling enforces the same compatibility contract.
#[test]
#[should_panic(expected = "incompatible contexts")]
fn test_fill_across_contexts_is_fatal() {
    let c1 = Context::new((), ());
    let c2 = Context::new((), ());
    let base = Derivation::new(
        TestValue::of(0),
        Sequence::singleton(Token::Slot(Slot::new("x"))),
        Some(c1),
        0.0,
    );
    let filler = tagged("z", &c2);
    let _ = base.replace_placeholder(
        "x",
        Replacement::Derivation(&filler),
        |a, _| Some(a.clone()),
        ReplaceOptions::default(),
        0.0,
    );
}
