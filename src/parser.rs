use crate::ast::{is_identifier, Expr, MoveDirection, Program, Stmt, TurnDirection};
use crate::error::{OmegaError, Span};
use crate::lexer::{function_header, Lexer, Token, TokenType};

const KEYWORDS: &[&str] = &[
    "IF", "THEN", "ELSE", "MOVE", "TURN", "SCAN_FOR_ENEMY", "ATTACK", "CALL", "FUNCTION", "END",
];

/// A whitespace-separated word of a statement, with its source span.
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    text: &'a str,
    span: Span,
}

/// Splits one statement into words. `=` is always a word of its own so that
/// `X=2` and `X = 2` read the same.
fn split_words(text: &str, base: usize) -> Vec<Word<'_>> {
    let mut bounds = Vec::new();
    let mut start: Option<usize> = None;

    for (index, c) in text.char_indices() {
        if c.is_whitespace() || c == '=' {
            if let Some(from) = start.take() {
                bounds.push((from, index));
            }
            if c == '=' {
                bounds.push((index, index + 1));
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(from) = start {
        bounds.push((from, text.len()));
    }

    bounds
        .into_iter()
        .map(|(from, to)| Word {
            text: &text[from..to],
            span: Span::new(base + from, base + to),
        })
        .collect()
}

fn words_span(words: &[Word<'_>]) -> Span {
    match (words.first(), words.last()) {
        (Some(first), Some(last)) => first.span.to(last.span),
        _ => Span::new(0, 0),
    }
}

fn words_text(words: &[Word<'_>]) -> String {
    words
        .iter()
        .map(|word| word.text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Forward-only cursor over the words of one statement.
struct Cursor<'w, 'a> {
    words: &'w [Word<'a>],
    current: usize,
}

impl<'w, 'a> Cursor<'w, 'a> {
    fn new(words: &'w [Word<'a>]) -> Self {
        Self { words, current: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.words.len()
    }

    fn peek(&self) -> Option<Word<'a>> {
        self.words.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<Word<'a>> {
        let word = self.peek()?;
        self.current += 1;
        Some(word)
    }

    fn check(&self, text: &str) -> bool {
        self.peek().is_some_and(|word| word.text == text)
    }

    fn match_word(&mut self, text: &str) -> bool {
        if self.check(text) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Consumes words up to (not including) the next `text`, or to the end.
    fn until(&mut self, text: &str) -> &'w [Word<'a>] {
        let start = self.current;
        while !self.is_at_end() && !self.check(text) {
            self.current += 1;
        }
        &self.words[start..self.current]
    }

    fn rest(&mut self) -> &'w [Word<'a>] {
        let rest = &self.words[self.current..];
        self.current = self.words.len();
        rest
    }
}

type Rule = fn(&mut Parser, &[Word<'_>]) -> Option<Stmt>;

/// Turns statement tokens into statements.
///
/// Never fails: a statement no rule recognises becomes [`Stmt::NoOp`] and a
/// warning is kept in [`Parser::diagnostics`].
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Vec<OmegaError>,
}

impl Parser {
    /// Tried in order; the first rule that matches wins.
    const RULES: [Rule; 7] = [
        Parser::conditional,
        Parser::assignment,
        Parser::move_statement,
        Parser::turn_statement,
        Parser::scan_statement,
        Parser::attack_statement,
        Parser::call_statement,
    ];

    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Program {
        let mut program = Program::default();

        while let Some(token) = self.advance() {
            match self.declaration(&token) {
                Stmt::FunctionDecl { name, body } => {
                    if program.functions.contains_key(&name) {
                        self.diagnostics.push(OmegaError::warning_with_help(
                            token.span,
                            format!("function '{}' is declared more than once", name),
                            "The last declaration replaces the earlier ones.".to_string(),
                        ));
                    }
                    program.functions.insert(name, body);
                }
                statement => program.top_level.push(statement),
            }
        }

        program
    }

    pub fn into_diagnostics(self) -> Vec<OmegaError> {
        self.diagnostics
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned()?;
        self.current += 1;
        Some(token)
    }

    fn declaration(&mut self, token: &Token) -> Stmt {
        match token.token_type {
            TokenType::FunctionBlock => self.function_declaration(token),
            TokenType::Statement => {
                let text = token.lexeme.strip_suffix(';').unwrap_or(&token.lexeme);
                let words = split_words(text, token.span.start);
                self.statement(&words)
            }
        }
    }

    fn function_declaration(&mut self, token: &Token) -> Stmt {
        let Some((header, lines)) = token.lines.split_first() else {
            return Stmt::NoOp;
        };
        let Some(name) = function_header(&header.text) else {
            return Stmt::NoOp;
        };

        let body_lines = match lines.split_last() {
            Some((last, body)) if last.text == "END" => body.to_vec(),
            _ => lines.to_vec(),
        };

        let mut lexer = Lexer::from_lines(body_lines);
        let tokens = lexer.scan_tokens();
        self.diagnostics.extend(lexer.into_diagnostics());

        // The lexer already dropped nested headers, so every body token is a
        // plain statement.
        let mut body = Vec::with_capacity(tokens.len());
        for body_token in &tokens {
            body.push(self.declaration(body_token));
        }

        Stmt::FunctionDecl {
            name: name.to_string(),
            body,
        }
    }

    fn statement(&mut self, words: &[Word<'_>]) -> Stmt {
        if words.is_empty() {
            return Stmt::NoOp;
        }

        for rule in Self::RULES {
            if let Some(statement) = rule(self, words) {
                return statement;
            }
        }

        self.unrecognized(words);
        Stmt::NoOp
    }

    fn unrecognized(&mut self, words: &[Word<'_>]) {
        let text = words_text(words);
        let first = words[0].text;
        let help = if first != first.to_uppercase() && KEYWORDS.contains(&first.to_uppercase().as_str()) {
            format!("Keywords are upper-case: did you mean '{}'?", first.to_uppercase())
        } else {
            "Expected one of: NAME = value, MOVE n FORWARD|BACKWARD|LEFT|RIGHT, TURN LEFT|RIGHT, \
             SCAN_FOR_ENEMY, ATTACK, IF cond THEN stmt ELSE stmt, CALL name."
                .to_string()
        };
        self.diagnostics.push(OmegaError::warning_with_help(
            words_span(words),
            format!("unrecognized statement '{}' does nothing", text),
            help,
        ));
    }

    /// `IF <expr> THEN <stmt> (ELSE <stmt>)?`
    fn conditional(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        let mut cursor = Cursor::new(words);
        if !cursor.match_word("IF") {
            return None;
        }
        let condition = cursor.until("THEN");
        if condition.is_empty() || !cursor.match_word("THEN") {
            return None;
        }
        let then_words = cursor.until("ELSE");
        if then_words.is_empty() {
            return None;
        }
        let else_words = if cursor.match_word("ELSE") {
            let rest = cursor.rest();
            if rest.is_empty() {
                return None;
            }
            Some(rest)
        } else {
            None
        };

        let condition = self.expression(condition);
        let then_branch = Box::new(self.statement(then_words));
        let else_branch = else_words.map(|words| Box::new(self.statement(words)));

        Some(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `<identifier> = <expr>`
    fn assignment(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        let mut cursor = Cursor::new(words);
        let name = cursor.advance()?;
        if !is_identifier(name.text) || !cursor.match_word("=") {
            return None;
        }
        let value = cursor.rest();
        if value.is_empty() {
            return None;
        }

        Some(Stmt::Assign {
            name: name.text.to_string(),
            value: self.expression(value),
        })
    }

    /// `MOVE <expr> FORWARD|BACKWARD|LEFT|RIGHT`
    fn move_statement(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        let mut cursor = Cursor::new(words);
        if !cursor.match_word("MOVE") {
            return None;
        }
        let amount = cursor.advance()?;
        let direction = MoveDirection::from_keyword(cursor.advance()?.text)?;
        if !cursor.is_at_end() {
            return None;
        }

        Some(Stmt::Move {
            amount: self.expression(&[amount]),
            direction,
        })
    }

    /// `TURN LEFT|RIGHT`
    fn turn_statement(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        let mut cursor = Cursor::new(words);
        if !cursor.match_word("TURN") {
            return None;
        }
        let direction = TurnDirection::from_keyword(cursor.advance()?.text)?;
        cursor.is_at_end().then_some(Stmt::Turn { direction })
    }

    fn scan_statement(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        matches!(words, [word] if word.text == "SCAN_FOR_ENEMY").then_some(Stmt::Scan)
    }

    fn attack_statement(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        matches!(words, [word] if word.text == "ATTACK").then_some(Stmt::Attack)
    }

    /// `CALL <identifier>`
    fn call_statement(&mut self, words: &[Word<'_>]) -> Option<Stmt> {
        match words {
            [call, name] if call.text == "CALL" && is_identifier(name.text) => Some(Stmt::Call {
                name: name.text.to_string(),
            }),
            _ => None,
        }
    }

    fn expression(&mut self, words: &[Word<'_>]) -> Expr {
        let text = words_text(words);
        Expr::parse_strict(&text).unwrap_or_else(|| {
            self.diagnostics.push(OmegaError::warning_with_help(
                words_span(words),
                format!("'{}' is not a number or $variable, using 0", text),
                "Expressions are a single integer like 3 or a variable like $ENEMY.".to_string(),
            ));
            Expr::Literal(0)
        })
    }
}

/// Parses Omega source into a [`Program`], silently turning anything
/// unrecognised into no-ops.
pub fn parse_program(source: &str) -> Program {
    parse_program_with_diagnostics(source).0
}

/// Like [`parse_program`], also returning warnings about statements that
/// were probably not meant to be no-ops.
pub fn parse_program_with_diagnostics(source: &str) -> (Program, Vec<OmegaError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.scan_tokens();

    let mut parser = Parser::new(tokens);
    let program = parser.parse();

    let mut diagnostics = lexer.into_diagnostics();
    diagnostics.extend(parser.into_diagnostics());
    diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);

    (program, diagnostics)
}

/// Parses a single statement token such as `MOVE 2 FORWARD;`.
pub fn parse_statement(text: &str) -> Stmt {
    let tokens = Lexer::new(text).scan_tokens();
    match tokens.first() {
        Some(token) => Parser::new(Vec::new()).declaration(token),
        None => Stmt::NoOp,
    }
}
