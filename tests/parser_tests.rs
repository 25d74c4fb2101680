//! Facade-level syntax tests: rendered trees and error positions.

use kairos::error::Error;
use kairos::SourceReader;

fn tree_of(source: &str) -> String {
    let (tree, _warnings) = kairos::render_syntax_tree(SourceReader::from_source(source))
        .expect("source should parse");
    tree
}

fn error_of(source: &str) -> Error {
    match kairos::render_syntax_tree(SourceReader::from_source(source)) {
        Err(error) => error,
        Ok(_) => panic!("source should not parse: {source}"),
    }
}

#[test]
fn small_program_renders_fully() {
    let tree = tree_of("var a = 1 + 2 * 3;\nprint a;");
    let expected = "\
Program
├── VariableDefinition
│   ├── IDENTIFIER : a
│   └── MathExpression
│       ├── NUMBER_LITERAL : 1
│       ├── PLUS : +
│       └── MultiplicativeMathExpression
│           ├── NUMBER_LITERAL : 2
│           ├── MULTIPLICATION : *
│           └── NUMBER_LITERAL : 3
└── Print
    └── IDENTIFIER : a
";
    assert_eq!(expected, tree);
}

#[test]
fn function_and_loop_render_their_structure() {
    let tree = tree_of(
        "fun f(a, b) { from a to b by days as d { print d; }; };",
    );
    for line in [
        "FunctionDefinition",
        "Parameters",
        "From",
        "DAYS : days",
        "IDENTIFIER : d",
        "Body",
        "Print",
    ] {
        assert!(tree.contains(line), "missing {line:?} in:\n{tree}");
    }
}

#[test]
fn literal_leaves_render_their_canonical_text() {
    let tree = tree_of("print 10.04.2018~10:57:00;\nprint '1Y 2D';\nprint \"hi\";");
    assert!(tree.contains("DATETIME_LITERAL : 10.04.2018~10:57:00"));
    assert!(tree.contains("TIMEDELTA_LITERAL : '1Y 0M 0W 2D 0h 0m 0s'"));
    assert!(tree.contains("STRING_LITERAL : \"hi\""));
}

#[test]
fn syntax_errors_carry_the_offending_position() {
    // `10` sits at line 1, column 6.
    match error_of("var a 10;") {
        Error::Syntactic(e) => {
            assert_eq!(1, e.pos.line);
            assert_eq!(6, e.pos.column);
        }
        other => panic!("expected a syntactic error, got {other:?}"),
    }

    // The second comparison operator on line 2 is the offender.
    match error_of("var ok = 1;\nif ok == 1 != 2 { };") {
        Error::Syntactic(e) => {
            assert_eq!(2, e.pos.line);
            assert_eq!(11, e.pos.column);
        }
        other => panic!("expected a syntactic error, got {other:?}"),
    }
}

#[test]
fn lexical_errors_surface_through_parsing() {
    match error_of("var a = 29.02.2019;") {
        Error::Lexical(e) => assert_eq!(8, e.pos.absolute),
        other => panic!("expected a lexical error, got {other:?}"),
    }
}
