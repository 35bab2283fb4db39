//! Diagnostics sink
//!
//! Components that run into structural oddities (a header that cannot be
//! attached, a link with nothing to attach to, skipped node kinds) report them
//! here instead of failing. Every entry is also forwarded to the `log` facade.

use std::fmt;

use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Note,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Note => write!(f, "note"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Source line (1-based) when known
    pub line: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {}): {}", self.level, line, self.message),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Collected diagnostics for one unit of work (usually one document)
#[derive(Debug, Default)]
pub struct Diagnostics {
    source: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics whose log lines are prefixed with a source name
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>, line: Option<usize>) {
        let message = message.into();
        warn!("{}{}", self.prefix(), message);
        self.entries.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            message,
            line,
        });
    }

    pub fn note(&mut self, message: impl Into<String>, line: Option<usize>) {
        let message = message.into();
        debug!("{}{}", self.prefix(), message);
        self.entries.push(Diagnostic {
            level: DiagnosticLevel::Note,
            message,
            line,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    fn prefix(&self) -> String {
        if self.source.is_empty() {
            String::new()
        } else {
            format!("{}: ", self.source)
        }
    }
}
