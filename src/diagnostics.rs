//! Diagnostics collector
//!
//! Accumulates info/warning/error entries with string codes across a whole
//! call chain (init, frame loop, shutdown). Owned by the top-level caller and
//! printed once after the process is done.

use std::fmt;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single diagnostic entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// Optional extra text (underlying library output, paths, ...)
    pub details: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Info => "INFO: ",
            Severity::Warning => "WARNING: ",
            Severity::Error => "ERROR: ",
        };
        write!(f, "[{}] {}{}", self.code, label, self.message)?;
        if !self.details.is_empty() {
            write!(f, "\n{}", self.details)?;
        }
        Ok(())
    }
}

/// Ordered list of diagnostics plus a success flag.
///
/// Recording an error flips the flag; warnings and infos never do.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    success: bool,
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
        }
    }

    pub fn info(&mut self, code: &str, message: impl Into<String>) {
        self.push(code, Severity::Info, message.into(), String::new());
    }

    pub fn warning(&mut self, code: &str, message: impl Into<String>) {
        self.push(code, Severity::Warning, message.into(), String::new());
    }

    pub fn error(&mut self, code: &str, message: impl Into<String>, details: impl Into<String>) {
        self.push(code, Severity::Error, message.into(), details.into());
        self.success = false;
    }

    /// Record a core error under its stable code.
    pub fn record(&mut self, err: &CoreError) {
        let details = match err {
            CoreError::ResourceLoadFailure { detail, .. } => detail.clone(),
            _ => String::new(),
        };
        self.error(err.code(), err.to_string(), details);
    }

    fn push(&mut self, code: &str, severity: Severity, message: String, details: String) {
        self.messages.push(Diagnostic {
            code: code.to_string(),
            severity,
            message,
            details,
        });
    }

    pub fn fail(&mut self) {
        self.success = false;
    }

    pub fn succeed(&mut self) {
        self.success = true;
    }

    pub fn is_failed(&self) -> bool {
        !self.success
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.messages.iter().any(|m| m.code == code)
    }

    pub fn find_code(&self, code: &str) -> Option<&Diagnostic> {
        self.messages.iter().find(|m| m.code == code)
    }

    /// Drop every entry carrying `code`. Does not touch the success flag.
    pub fn remove_code(&mut self, code: &str) {
        self.messages.retain(|m| m.code != code);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for msg in &self.messages {
            writeln!(f, "{}", msg)?;
        }
        Ok(())
    }
}
