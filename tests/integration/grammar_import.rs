//! Integration tests for the compiled grammar boundary

use weave::error::GrammarError;
use weave::grammar::{CompiledGrammar, CompiledSymbol};
use weave::slot::SlotConstraint;

#[test]
fn test_import_from_reader() {
    let text = r#"{
        "nonterminals": ["thing_list"],
        "productions": [
            {
                "lhs": "thing_list",
                "rhs": [
                    {"kind": "terminal", "text": "list"},
                    {"kind": "slot", "name": "table"},
                    {"kind": "choice", "alternatives": ["please", "now"]}
                ],
                "priority": 0.5
            }
        ]
    }"#;
    let grammar = CompiledGrammar::from_json_reader(text.as_bytes()).unwrap();
    assert_eq!(grammar.nonterminals, vec!["thing_list".to_string()]);
    let rhs = &grammar.productions[0].rhs;
    assert_eq!(rhs.len(), 3);
    assert_eq!(
        rhs[1],
        CompiledSymbol::Slot {
            name: "table".to_string(),
            constraint: SlotConstraint::Unconstrained,
        }
    );
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = CompiledGrammar::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, GrammarError::Parse(_)));
}

#[test]
fn test_validation_runs_on_import() {
    let text = r#"{
        "nonterminals": ["a"],
        "productions": [
            {"lhs": "a", "rhs": [{"kind": "non_terminal", "symbol": "b"}]}
        ]
    }"#;
    let err = CompiledGrammar::from_json_str(text).unwrap_err();
    match err {
        GrammarError::UnknownSymbol { lhs, symbol } => {
            assert_eq!(lhs, "a");
            assert_eq!(symbol, "b");
        }
        other => panic!("expected UnknownSymbol, got {other:?}"),
    }
}

#[test]
fn test_non_finite_priority_is_validation_error() {
    let grammar = CompiledGrammar {
        nonterminals: vec!["a".to_string()],
        productions: vec![weave::grammar::CompiledProduction {
            lhs: "a".to_string(),
            rhs: vec![],
            priority: f64::NAN,
        }],
    };
    assert!(matches!(
        grammar.validate().unwrap_err(),
        GrammarError::NonFinitePriority { .. }
    ));
}
