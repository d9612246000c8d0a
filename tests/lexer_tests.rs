use omega::lexer::{tokenize, Lexer, TokenType};
use omega::Span;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn splits_statements_and_resuffixes_semicolons() {
    assert_eq!(
        tokenize("A = 1; B = 2\nATTACK"),
        vec!["A = 1;", "B = 2;", "ATTACK;"]
    );
}

#[test]
fn strips_comments_and_blank_lines() {
    let source = "MOVE 1 FORWARD // go\n// whole line\n\n   TURN LEFT   \n";
    assert_eq!(tokenize(source), vec!["MOVE 1 FORWARD;", "TURN LEFT;"]);
}

#[test]
fn function_block_is_one_token() {
    let source = "FUNCTION Patrol:\n  MOVE 1 FORWARD;\n\n  // comment\n  TURN RIGHT\nEND\nCALL Patrol";
    let tokens = Lexer::new(source).scan_tokens();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].token_type, TokenType::FunctionBlock);
    assert_eq!(
        tokens[0].lexeme,
        "FUNCTION Patrol:\nMOVE 1 FORWARD;\nTURN RIGHT\nEND"
    );
    assert_eq!(tokens[1].token_type, TokenType::Statement);
    assert_eq!(tokens[1].lexeme, "CALL Patrol;");
}

#[test]
fn header_allows_space_before_colon() {
    let tokens = Lexer::new("FUNCTION Spin :\nTURN LEFT\nEND").scan_tokens();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type, TokenType::FunctionBlock);
}

#[test]
fn header_with_trailing_code_is_an_ordinary_line() {
    let tokens = Lexer::new("FUNCTION f: ATTACK\nEND").scan_tokens();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.token_type == TokenType::Statement));
}

#[test]
fn token_spans_point_into_source() {
    let source = "X = 1;  ATTACK";
    let tokens = Lexer::new(source).scan_tokens();

    assert_eq!(tokens[0].span, Span::new(0, 5));
    assert_eq!(tokens[1].span, Span::new(8, 14));
    assert_eq!(&source[tokens[1].span.start..tokens[1].span.end], "ATTACK");
}

#[test]
fn nested_header_is_dropped_with_warning() {
    let source = "FUNCTION a:\nFUNCTION b:\nATTACK\nEND\nEND";
    let mut lexer = Lexer::new(source);
    let tokens = lexer.scan_tokens();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].lexeme, "FUNCTION a:\nATTACK\nEND");
    assert_eq!(tokens[1].lexeme, "END;");
    assert_eq!(lexer.diagnostics().len(), 1);
    assert!(lexer.diagnostics()[0].message.contains("nested"));
}

#[test]
fn unterminated_block_runs_to_end_of_input() {
    let mut lexer = Lexer::new("FUNCTION a:\nATTACK\nTURN LEFT");
    let tokens = lexer.scan_tokens();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type, TokenType::FunctionBlock);
    assert_eq!(tokens[0].lexeme, "FUNCTION a:\nATTACK\nTURN LEFT");
    assert!(lexer.diagnostics()[0].message.contains("missing its END"));
}

fn statement() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "ATTACK",
        "MOVE 2 FORWARD",
        "X = 3",
        "TURN LEFT",
        "SCAN_FOR_ENEMY",
        "CALL Patrol",
        "IF $ENEMY THEN ATTACK ELSE TURN RIGHT",
    ])
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![";", "; ", " ;\n", "\n", ";\n\n", "  ;  ;"])
}

proptest! {
    #[test]
    fn tokens_rejoin_to_the_statements(
        parts in prop::collection::vec((statement(), separator()), 0..12)
    ) {
        let source: String = parts.iter().map(|(s, sep)| format!("{}{}", s, sep)).collect();
        let statements: Vec<&str> = parts.iter().map(|(s, _)| *s).collect();

        let tokens = tokenize(&source);
        let rejoined: Vec<&str> = tokens
            .iter()
            .map(|t| t.strip_suffix(';').unwrap_or(t))
            .collect();
        prop_assert_eq!(rejoined, statements);
    }

    #[test]
    fn function_block_stays_atomic(
        body in prop::collection::vec(prop::sample::select(vec![
            "ATTACK;", "", "   ", "// note", "TURN LEFT // inline", "MOVE 1 FORWARD; TURN RIGHT",
        ]), 0..10)
    ) {
        let source = format!("FUNCTION f:\n{}\nEND\n", body.join("\n"));
        let tokens = Lexer::new(&source).scan_tokens();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].token_type, TokenType::FunctionBlock);
    }
}
