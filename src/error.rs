//! Structured diagnostics (SPEC_FULL §7).
//!
//! Grounded on the teacher's `ParseError { kind, span }` with
//! `display_with_source` producing a caret-annotated rendering; generalized
//! here into `Diagnostic` (severity + span + message + optional hint +
//! optional did-you-mean) and a `Diagnostics` collector that keeps the
//! checker's errors and warnings apart, matching §4.7's two-pass contract.

use crate::dialect::{Dialect, DialectSet};
use crate::suggest::{find_similar, KNOWN_WORDS};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        })
    }
}

/// One of the error kinds enumerated in SPEC_FULL §7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Lexical,
    Grammar,
    UnknownIdentifier,
    TypeCombination { would_be_legal_in: DialectSet },
    DialectFeature { feature: String, needs: DialectSet },
    KindStructural,
    Naming,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub kind: Kind,
    pub message: String,
    pub hint: Option<String>,
    pub did_you_mean: Vec<String>,
}

impl Diagnostic {
    pub fn error(kind: Kind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            span,
            kind,
            message: message.into(),
            hint: None,
            did_you_mean: Vec::new(),
        }
    }

    pub fn warning(kind: Kind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            span,
            kind,
            message: message.into(),
            hint: None,
            did_you_mean: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_suggestion(mut self, word: &str) -> Self {
        if let Some(close) = find_similar(word, KNOWN_WORDS, 2) {
            self.did_you_mean.push(close.to_string());
        }
        self
    }

    pub fn dialect_feature(span: Span, feature: &str, needs: DialectSet, active: Dialect) -> Self {
        let clause = needs.which(active);
        let message = if clause.is_empty() {
            format!("'{feature}' is not valid here")
        } else {
            format!("'{feature}' is valid {clause}")
        };
        Diagnostic::error(
            Kind::DialectFeature {
                feature: feature.to_string(),
                needs,
            },
            span,
            message,
        )
    }

    /// Caret-annotated rendering, grounded on the teacher's
    /// `ParseError::display_with_source`.
    pub fn display_with_source(&self, source: &str) -> String {
        let (line_num, line_start, line_content) = find_context(source, self.span.start);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end - self.span.start).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let mut result = format!(
            "{}: {}\n\n{:4} | {}\n     | {}",
            self.severity, self.message, line_num, line_content, underline
        );

        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n     | hint: {hint}"));
        }
        for candidate in &self.did_you_mean {
            result.push_str(&format!("\n     | did you mean '{candidate}'?"));
        }
        result
    }
}

fn find_context(source: &str, pos: usize) -> (usize, usize, &str) {
    let mut line_num = 1;
    let mut line_start = 0;
    for (i, c) in source.char_indices() {
        if i >= pos {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }
    let line_end = source[line_start..]
        .find('\n')
        .map(|off| line_start + off)
        .unwrap_or(source.len());
    (line_num, line_start, &source[line_start..line_end])
}

/// Collects errors and warnings produced over one `parse`/`check` pass.
/// §4.7: the first error aborts that tree's error pass; the warning pass
/// never short-circuits.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, d: Diagnostic) {
        debug_assert_eq!(d.severity, Severity::Error);
        self.errors.push(d);
    }

    pub fn push_warning(&mut self, d: Diagnostic) {
        debug_assert_eq!(d.severity, Severity::Warning);
        self.warnings.push(d);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn all(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError(pub String);

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal error: {}", self.0)
    }
}

impl std::error::Error for FatalError {}
