use omega::ast::{Expr, MoveDirection, Stmt, TurnDirection};
use omega::{parse_program, parse_program_with_diagnostics, parse_statement, Span};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashMap;

const PATROL: &str = "\
FUNCTION Patrol:
  MOVE 1 FORWARD
  TURN RIGHT
END
CALL Patrol;
ATTACK;
";

#[test]
fn functions_go_to_the_table() {
    let program = parse_program(PATROL);

    assert_eq!(
        program.top_level,
        vec![
            Stmt::Call {
                name: "Patrol".to_string()
            },
            Stmt::Attack,
        ]
    );
    assert_eq!(
        program.function("Patrol"),
        Some(
            &[
                Stmt::Move {
                    amount: Expr::Literal(1),
                    direction: MoveDirection::Forward,
                },
                Stmt::Turn {
                    direction: TurnDirection::Right,
                },
            ][..]
        )
    );
}

#[test]
fn last_declaration_wins() {
    let source = "FUNCTION f:\nATTACK\nEND\nFUNCTION f:\nSCAN_FOR_ENEMY\nEND";
    let (program, diagnostics) = parse_program_with_diagnostics(source);

    assert_eq!(program.function("f"), Some(&[Stmt::Scan][..]));
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("declared more than once"));
}

#[test]
fn statements_keep_source_order_around_functions() {
    let source = "X = 1\nFUNCTION f:\nATTACK\nEND\nX = 2";
    let program = parse_program(source);

    assert_eq!(program.top_level.len(), 2);
    assert_eq!(program.functions.len(), 1);
    assert_eq!(
        program.top_level[1],
        Stmt::Assign {
            name: "X".to_string(),
            value: Expr::Literal(2)
        }
    );
}

#[test]
fn warnings_point_at_the_bad_statement() {
    let (program, diagnostics) = parse_program_with_diagnostics("ATTACK;\nattack;");

    assert_eq!(program.top_level, vec![Stmt::Attack, Stmt::NoOp]);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span, Span::new(8, 14));
    assert!(diagnostics[0]
        .help
        .as_deref()
        .is_some_and(|help| help.contains("did you mean 'ATTACK'")));
}

#[test]
fn warnings_inside_function_bodies_keep_their_position() {
    let (_, diagnostics) = parse_program_with_diagnostics("FUNCTION f:\n  jump\nEND");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span, Span::new(14, 18));
}

#[test]
fn unterminated_function_still_declares() {
    let (program, diagnostics) = parse_program_with_diagnostics("FUNCTION f:\nATTACK");

    assert_eq!(program.function("f"), Some(&[Stmt::Attack][..]));
    assert!(program.top_level.is_empty());
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn single_statement_parsing() {
    assert_eq!(parse_statement("ATTACK;"), Stmt::Attack);
    assert_eq!(parse_statement(""), Stmt::NoOp);
    assert_eq!(parse_statement("nonsense"), Stmt::NoOp);
}

#[test]
fn expression_forms() {
    let mut variables = HashMap::new();
    variables.insert("ENEMY".to_string(), 1);

    assert_eq!(Expr::parse("$ENEMY"), Expr::Variable("ENEMY".to_string()));
    assert_eq!(Expr::parse("$ENEMY").evaluate(&variables), 1);
    assert_eq!(Expr::parse("$MISSING").evaluate(&variables), 0);
    assert_eq!(Expr::parse("42").evaluate(&variables), 42);
    assert_eq!(Expr::parse("4x2"), Expr::Literal(0));
    assert_eq!(Expr::parse("$"), Expr::Literal(0));
    assert_eq!(Expr::parse_strict("$"), None);
}

proptest! {
    #[test]
    fn evaluation_is_total(text in ".*") {
        let value = Expr::parse(&text).evaluate(&HashMap::new());
        if text.trim().starts_with('$') {
            prop_assert_eq!(value, 0);
        }
    }

    #[test]
    fn parsing_never_panics(source in "[A-Z$=;:/ \n0-9a-z_-]{0,80}") {
        let (program, _) = parse_program_with_diagnostics(&source);
        let no_top_level_functions = program
            .top_level
            .iter()
            .all(|s| !matches!(s, Stmt::FunctionDecl { .. }));
        prop_assert!(no_top_level_functions);
    }
}

#[test]
fn nested_header_leaves_only_plain_statements_in_the_body() {
    let (program, diagnostics) =
        parse_program_with_diagnostics("FUNCTION outer:\nFUNCTION inner:\nATTACK\nEND");

    assert_eq!(program.function("outer"), Some(&[Stmt::Attack][..]));
    assert_eq!(program.function("inner"), None);
    assert_eq!(diagnostics.len(), 1);
}
