//! Collected configuration problems.

use std::fmt;

/// Severity of a configuration problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Config field path (e.g. `site.theme_config.sidebar[0].items`)
    pub field: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: [{}] {}", label, self.field, self.message)
    }
}

/// Problems found while validating a configuration.
///
/// Validation reports every problem instead of stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, field, message);
    }

    pub fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, field, message);
    }

    fn push(&mut self, severity: Severity, field: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity,
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Turn every warning into an error.
    pub fn escalate_warnings(&mut self) {
        for item in &mut self.items {
            item.severity = Severity::Error;
        }
    }

    /// Log all warnings through `tracing`.
    pub fn log_warnings(&self) {
        for warning in self.warnings() {
            tracing::warn!("[{}] {}", warning.field, warning.message);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_errors_and_warnings() {
        let mut diag = Diagnostics::new();
        diag.error("site.src_dir", "directory not found");
        diag.warn("site.theme_config.nav[0].link", "no page for /missing");

        assert!(diag.has_errors());
        assert_eq!(diag.errors().count(), 1);
        assert_eq!(diag.warnings().count(), 1);
        assert_eq!(
            diag.to_string(),
            "error: [site.src_dir] directory not found\n\
             warning: [site.theme_config.nav[0].link] no page for /missing"
        );
    }

    #[test]
    fn escalates_warnings() {
        let mut diag = Diagnostics::new();
        diag.warn("site.theme_config.nav[0].link", "no page");
        assert!(!diag.has_errors());

        diag.escalate_warnings();
        assert!(diag.has_errors());
    }
}
