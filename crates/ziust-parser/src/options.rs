//! Parser configuration.

use std::time::Duration;

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Name of the source, used only in diagnostics.
    pub source_name: Option<String>,
    /// Abort after this many rule evaluations.
    pub max_steps: Option<u64>,
    /// Abort once this much wall-clock time has passed.
    pub deadline: Option<Duration>,
}

impl ParseOptions {
    /// Create a new configuration with default settings (no budget).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source name.
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Set the step budget.
    pub fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Set the wall-clock budget.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The name to show in diagnostics.
    pub fn display_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or("<input>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.max_steps.is_none());
        assert!(options.deadline.is_none());
        assert_eq!(options.display_name(), "<input>");
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .source_name("main.zs")
            .max_steps(10)
            .deadline(Duration::from_millis(5));
        assert_eq!(options.display_name(), "main.zs");
        assert_eq!(options.max_steps, Some(10));
        assert_eq!(options.deadline, Some(Duration::from_millis(5)));
    }
}
