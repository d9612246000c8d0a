use crate::ast::is_identifier;
use crate::error::{OmegaError, Span};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// One `;`-terminated statement.
    Statement,
    /// A whole `FUNCTION name: ... END` block.
    FunctionBlock,
}

/// A comment-free, trimmed, non-empty source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub span: Span,
    /// The captured lines of a function block, header and `END` included.
    /// Empty for plain statements.
    pub lines: Vec<SourceLine>,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            span,
            lines: Vec::new(),
        }
    }

    fn function_block(lines: Vec<SourceLine>) -> Self {
        let lexeme = lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let span = match (lines.first(), lines.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::new(0, 0),
        };
        Self {
            token_type: TokenType::FunctionBlock,
            lexeme,
            span,
            lines,
        }
    }
}

/// Splits Omega source into statement tokens.
///
/// Never fails; suspicious layout (nested or unterminated function blocks)
/// is recorded in [`Lexer::diagnostics`].
pub struct Lexer {
    lines: Vec<SourceLine>,
    current: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<OmegaError>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::from_lines(split_lines(source))
    }

    /// Lexes already-split lines, keeping their original spans. Used to
    /// re-tokenize a function body.
    pub fn from_lines(lines: Vec<SourceLine>) -> Self {
        Self {
            lines,
            current: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            let line = self.advance();
            if function_header(&line.text).is_some() {
                self.function_block(line);
            } else {
                self.statements(&line);
            }
        }

        for token in &self.tokens {
            trace!(kind = ?token.token_type, lexeme = %token.lexeme, "token");
        }
        self.tokens.clone()
    }

    pub fn diagnostics(&self) -> &[OmegaError] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<OmegaError> {
        self.diagnostics
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.lines.len()
    }

    fn advance(&mut self) -> SourceLine {
        let line = self.lines[self.current].clone();
        self.current += 1;
        line
    }

    fn function_block(&mut self, header: SourceLine) {
        let header_span = header.span;
        let mut captured = vec![header];

        loop {
            if self.is_at_end() {
                self.diagnostics.push(OmegaError::warning_with_help(
                    header_span,
                    "function block is missing its END".to_string(),
                    "Everything up to the end of the program was taken as the function body."
                        .to_string(),
                ));
                break;
            }

            let line = self.advance();
            if line.text == "END" {
                captured.push(line);
                break;
            }
            if function_header(&line.text).is_some() {
                self.diagnostics.push(OmegaError::warning_with_help(
                    line.span,
                    "nested FUNCTION declarations are not supported".to_string(),
                    "Close the enclosing function with END before declaring another one."
                        .to_string(),
                ));
                continue;
            }
            captured.push(line);
        }

        self.tokens.push(Token::function_block(captured));
    }

    fn statements(&mut self, line: &SourceLine) {
        let mut offset = 0;
        for piece in line.text.split(';') {
            let piece_start = offset;
            offset += piece.len() + 1;

            let trimmed = piece.trim();
            if trimmed.is_empty() {
                continue;
            }
            let leading = piece.len() - piece.trim_start().len();
            let start = line.span.start + piece_start + leading;
            self.tokens.push(Token::new(
                TokenType::Statement,
                format!("{};", trimmed),
                Span::new(start, start + trimmed.len()),
            ));
        }
    }
}

/// Convenience: the raw statement strings of `source`.
pub fn tokenize(source: &str) -> Vec<String> {
    Lexer::new(source)
        .scan_tokens()
        .into_iter()
        .map(|token| token.lexeme)
        .collect()
}

/// Strips `//` comments and returns the trimmed non-empty lines with their
/// byte spans in `source`.
pub fn split_lines(source: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut line_start = 0;

    for raw in source.split('\n') {
        let code = match raw.find("//") {
            Some(index) => &raw[..index],
            None => raw,
        };
        let text = code.trim();
        if !text.is_empty() {
            let leading = code.len() - code.trim_start().len();
            let start = line_start + leading;
            lines.push(SourceLine {
                text: text.to_string(),
                span: Span::new(start, start + text.len()),
            });
        }
        line_start += raw.len() + 1;
    }

    lines
}

/// Returns the function name if `line` is a `FUNCTION <identifier>:` header.
pub fn function_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("FUNCTION")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim().strip_suffix(':')?.trim_end();
    is_identifier(name).then_some(name)
}
