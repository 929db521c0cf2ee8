//! Diagnostic queue: collects diagnostics during a compilation run.
//!
//! Diagnostics arrive in compilation order, which for sibling declarations
//! matches source order; [`DiagnosticQueue::take_sorted`] additionally
//! sorts by position so template-instantiation errors attributed to a
//! declaration site appear where the reader expects them.

use crate::{Diagnostic, Severity};

/// Default error limit; further errors are dropped.
const DEFAULT_ERROR_LIMIT: usize = 20;

#[derive(Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_limit: usize,
    errors_seen: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_limit: DEFAULT_ERROR_LIMIT,
            errors_seen: 0,
        }
    }

    /// A queue with no error limit, for tests.
    pub fn unlimited() -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_limit: usize::MAX,
            errors_seen: 0,
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Error {
            if self.errors_seen >= self.error_limit {
                return;
            }
            self.errors_seen += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.errors_seen > 0
    }

    pub fn error_count(&self) -> usize {
        self.errors_seen
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the queue, sorted by source position (offset, then code).
    pub fn take_sorted(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(|d| (d.pos.offset, d.code.code()));
        out
    }
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        DiagnosticQueue::new()
    }
}

#[cfg(test)]
mod tests;
