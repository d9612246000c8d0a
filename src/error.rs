use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source that still runs, but probably not the way the author meant.
    Warning,
    Io,
}

/// A diagnostic attached to a region of Omega source.
///
/// The interpreter itself never fails; these only describe suspicious input
/// (a statement that parsed to a no-op) or problems in the surrounding CLI.
#[derive(Debug, Clone)]
pub struct OmegaError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl OmegaError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn warning_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::Warning, span, message, help)
    }

    pub fn io_error(path: &str, error: &std::io::Error) -> Self {
        Self::new(
            ErrorKind::Io,
            Span::new(0, 0),
            format!("cannot read '{}': {}", path, error),
        )
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        // Nothing in the source to point at.
        if self.kind == ErrorKind::Io {
            eprintln!("Error: {}", self.message);
            return;
        }

        let (report_kind, color, kind_str) = match self.kind {
            ErrorKind::Warning => (ReportKind::Warning, Color::Yellow, "Warning"),
            ErrorKind::Io => (ReportKind::Error, Color::Red, "I/O Error"),
        };

        let mut report_builder = Report::build(report_kind, filename, self.span.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(error) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            eprintln!("{}: {} ({})", kind_str, self.message, error);
        }
    }
}

impl fmt::Display for OmegaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OmegaError {}
