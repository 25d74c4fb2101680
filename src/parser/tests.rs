use super::*;
use crate::arena::Arena;
use crate::ast::{render_tree, Expr, Stmt};
use crate::error::{Error, SyntacticErrorKind};
use crate::intern::Interner;
use crate::source::SourceReader;
use crate::values::TimeUnit;

/// Runs `check` against the parsed program. Arenas live on this frame, so
/// the tree must be inspected inside the closure.
fn with_program<F>(source: &str, check: F)
where
    F: FnOnce(&crate::ast::Program<'_>, &Interner),
{
    let mut interner = Interner::new();
    let lexer = Lexer::new(SourceReader::from_source(source), &mut interner);

    let exprs = Arena::new();
    let expr_refs = Arena::new();
    let links = Arena::new();
    let stmts = Arena::new();
    let defs = Arena::new();
    let anchor_tokens = Arena::new();
    let arena = AstArena::new(&exprs, &expr_refs, &links, &stmts, &defs, &anchor_tokens);

    let mut parser = Parser::new(lexer, arena);
    let program = parser.parse_program().expect("program should parse");
    drop(parser);
    check(&program, &interner);
}

fn with_expression<F>(source: &str, check: F)
where
    F: FnOnce(&Expr<'_>, &Interner),
{
    let mut interner = Interner::new();
    let lexer = Lexer::new(SourceReader::from_source(source), &mut interner);

    let exprs = Arena::new();
    let expr_refs = Arena::new();
    let links = Arena::new();
    let stmts = Arena::new();
    let defs = Arena::new();
    let anchor_tokens = Arena::new();
    let arena = AstArena::new(&exprs, &expr_refs, &links, &stmts, &defs, &anchor_tokens);

    let mut parser = Parser::new(lexer, arena);
    let expr = parser.expression().expect("expression should parse");
    drop(parser);
    check(expr, &interner);
}

fn parse_error(source: &str) -> SyntacticErrorKind {
    let mut interner = Interner::new();
    let lexer = Lexer::new(SourceReader::from_source(source), &mut interner);

    let exprs = Arena::new();
    let expr_refs = Arena::new();
    let links = Arena::new();
    let stmts = Arena::new();
    let defs = Arena::new();
    let anchor_tokens = Arena::new();
    let arena = AstArena::new(&exprs, &expr_refs, &links, &stmts, &defs, &anchor_tokens);

    let mut parser = Parser::new(lexer, arena);
    match parser.parse_program() {
        Err(Error::Syntactic(e)) => e.kind,
        Err(other) => panic!("expected a syntactic error, got {other:?}"),
        Ok(_) => panic!("{source:?} should not parse"),
    }
}

#[test]
fn single_operand_levels_collapse_to_the_operand() {
    with_expression("1", |expr, _| {
        assert!(matches!(expr, Expr::Literal(_)), "got {expr:?}");
    });
    with_expression("deadline", |expr, _| {
        assert!(matches!(expr, Expr::Variable(_)));
    });
}

#[test]
fn multiplication_stays_nested_under_addition() {
    with_expression("a + b * c", |expr, _| {
        let Expr::Math(chain) = expr else {
            panic!("expected a math chain, got {expr:?}");
        };
        assert!(matches!(chain.first, Expr::Variable(_)));
        assert_eq!(1, chain.rest.len());
        assert_eq!(TokenType::Plus, chain.rest[0].0.kind());
        assert!(matches!(chain.rest[0].1, Expr::Multiplicative(_)));
    });
}

#[test]
fn parenthesised_expressions_collapse_into_their_content() {
    with_expression("(1 + 2) * 3", |expr, _| {
        let Expr::Multiplicative(chain) = expr else {
            panic!("expected a multiplicative chain, got {expr:?}");
        };
        assert!(matches!(chain.first, Expr::Math(_)));
        assert!(matches!(chain.rest[0].1, Expr::Literal(_)));
    });
}

#[test]
fn or_binds_looser_than_and() {
    with_expression("a | b & c", |expr, _| {
        let Expr::Or(chain) = expr else {
            panic!("expected an or chain, got {expr:?}");
        };
        assert!(matches!(chain.rest[0].1, Expr::And(_)));
    });
}

#[test]
fn logic_negation_wraps_the_math_expression() {
    with_expression("!a + b", |expr, _| {
        let Expr::LogicNegation { operand, .. } = expr else {
            panic!("expected a negation, got {expr:?}");
        };
        assert!(matches!(operand, Expr::Math(_)));
    });
}

#[test]
fn unary_minus_applies_after_time_info_access() {
    with_expression("-d.days", |expr, _| {
        let Expr::MathNegation { operand, .. } = expr else {
            panic!("expected a math negation, got {expr:?}");
        };
        let Expr::TimeInfo { operand, unit, .. } = operand else {
            panic!("expected a time-info access, got {operand:?}");
        };
        assert_eq!(TimeUnit::Days, *unit);
        assert!(matches!(operand, Expr::Variable(_)));
    });
}

#[test]
fn call_results_take_trailing_access() {
    with_expression("next_week().days", |expr, _| {
        let Expr::TimeInfo { operand, .. } = expr else {
            panic!("expected a time-info access, got {expr:?}");
        };
        assert!(matches!(operand, Expr::Call(_)));
    });
}

#[test]
fn call_arguments_are_full_expressions() {
    with_expression("shift(d + '1D', 2 * n)", |expr, interner| {
        let Expr::Call(call) = expr else {
            panic!("expected a call, got {expr:?}");
        };
        assert_eq!("shift", interner.resolve(call.name.symbol()));
        assert_eq!(2, call.args.len());
        assert!(matches!(call.args[0], Expr::Math(_)));
        assert!(matches!(call.args[1], Expr::Multiplicative(_)));
    });
}

#[test]
fn equality_chains_are_rejected() {
    assert!(matches!(
        parse_error("if a == b != c { return; };"),
        SyntacticErrorKind::ChainedComparison {
            found: TokenType::NotEquals
        }
    ));
}

#[test]
fn relational_chains_are_rejected() {
    assert!(matches!(
        parse_error("if a > b < c { return; };"),
        SyntacticErrorKind::ChainedComparison {
            found: TokenType::Less
        }
    ));
}

#[test]
fn equality_of_relations_is_allowed() {
    with_expression("a < b == c", |expr, _| {
        let Expr::Equality(cmp) = expr else {
            panic!("expected an equality, got {expr:?}");
        };
        assert!(matches!(cmp.left, Expr::Relational(_)));
    });
}

#[test]
fn variable_definition_requires_assign_or_semicolon() {
    assert!(matches!(
        parse_error("var a 10;"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::NumberLiteral,
            ..
        }
    ));
}

#[test]
fn statement_identifier_must_call_or_assign() {
    assert!(matches!(
        parse_error("a;"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::Semicolon,
            ..
        }
    ));
}

#[test]
fn statements_require_their_semicolon() {
    assert!(matches!(
        parse_error("print 1"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::End,
            ..
        }
    ));
    assert!(matches!(
        parse_error("fun f() { }"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::End,
            ..
        }
    ));
    assert!(matches!(
        parse_error("if 1 { } else { }"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::End,
            ..
        }
    ));
}

#[test]
fn function_definitions_do_not_nest() {
    assert!(matches!(
        parse_error("if 1 { fun f() {}; };"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::Fun,
            ..
        }
    ));
}

#[test]
fn function_definition_collects_name_params_and_body() {
    with_program("fun shift(d, n) { return d + n; };", |program, interner| {
        assert_eq!(1, program.statements.len());
        let Stmt::FunctionDef(def) = &program.statements[0] else {
            panic!("expected a function definition");
        };
        assert_eq!("shift", interner.resolve(def.name.symbol()));
        let params: Vec<&str> = def
            .params
            .iter()
            .map(|p| interner.resolve(p.symbol()))
            .collect();
        assert_eq!(vec!["d", "n"], params);
        assert_eq!(1, def.body.len());
        assert!(matches!(def.body[0], Stmt::Return { .. }));
    });
}

#[test]
fn from_statement_collects_all_parts() {
    with_program(
        "from 01.01.2020 to 05.01.2020 by days as d { print d; };",
        |program, interner| {
            let Stmt::From {
                unit, iterator, body, ..
            } = &program.statements[0]
            else {
                panic!("expected a from statement");
            };
            assert_eq!(TimeUnit::Days, *unit);
            assert_eq!("d", interner.resolve(iterator.symbol()));
            assert_eq!(1, body.len());
        },
    );
}

#[test]
fn from_requires_a_unit_keyword() {
    assert!(matches!(
        parse_error("from 1 to 2 by d as i { };"),
        SyntacticErrorKind::UnexpectedToken {
            found: TokenType::Identifier,
            ..
        }
    ));
}

#[test]
fn if_with_and_without_else() {
    with_program("if a { print 1; };", |program, _| {
        let Stmt::If { else_body, .. } = &program.statements[0] else {
            panic!("expected an if");
        };
        assert!(else_body.is_none());
    });
    with_program("if a { } else { print 2; };", |program, _| {
        let Stmt::If { else_body, .. } = &program.statements[0] else {
            panic!("expected an if");
        };
        assert_eq!(1, else_body.expect("else body").len());
    });
}

#[test]
fn return_with_and_without_value() {
    with_program("return;", |program, _| {
        let Stmt::Return { expr, .. } = &program.statements[0] else {
            panic!("expected a return");
        };
        assert!(expr.is_none());
    });
    with_program("return 1 + 2 * 3;", |program, _| {
        let Stmt::Return { expr, .. } = &program.statements[0] else {
            panic!("expected a return");
        };
        assert!(matches!(expr, Some(Expr::Math(_))));
    });
}

#[test]
fn variable_definition_with_and_without_initialiser() {
    with_program("var a; var b = 5;", |program, _| {
        let Stmt::VariableDef { init, .. } = &program.statements[0] else {
            panic!("expected a definition");
        };
        assert!(init.is_none());
        let Stmt::VariableDef { init, .. } = &program.statements[1] else {
            panic!("expected a definition");
        };
        assert!(init.is_some());
    });
}

#[test]
fn statement_position_calls_become_call_statements() {
    with_program("notify(1, 2);", |program, _| {
        let Stmt::Call(expr) = &program.statements[0] else {
            panic!("expected a call statement");
        };
        assert!(matches!(expr, Expr::Call(_)));
    });
}

#[test]
fn bad_statement_start_lists_the_statement_first_set() {
    let SyntacticErrorKind::UnexpectedToken { expected, found } = parse_error("+ 1;") else {
        panic!("expected an unexpected-token error");
    };
    assert_eq!(TokenType::Plus, found);
    assert_eq!(FIRST_STATEMENT, expected.0.as_slice());
}

#[test]
fn rendered_tree_shows_nesting_and_leaf_tokens() {
    with_program("print 1 + 2;", |program, interner| {
        let rendered = render_tree(program, interner);
        let expected = "\
Program
└── Print
    └── MathExpression
        ├── NUMBER_LITERAL : 1
        ├── PLUS : +
        └── NUMBER_LITERAL : 2
";
        assert_eq!(expected, rendered);
    });
}
