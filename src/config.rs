//! Interpreter configuration

/// Environment variable holding the optional loop iteration ceiling
pub const MAX_ITERATIONS_VAR: &str = "TREELOX_MAX_ITERATIONS";

/// Runtime limits for an [`Interpreter`](crate::Interpreter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterpreterConfig {
    /// Maximum iterations a single loop may run before it fails.
    /// `None` lets loops run to completion.
    pub max_loop_iterations: Option<usize>,
}

impl InterpreterConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_loop_iterations = lookup(MAX_ITERATIONS_VAR).and_then(|raw| {
            let parsed = raw.trim().parse::<usize>().ok();
            if parsed.is_none() {
                tracing::warn!(value = %raw, "ignoring unparsable {}", MAX_ITERATIONS_VAR);
            }
            parsed
        });

        InterpreterConfig {
            max_loop_iterations,
        }
    }

    /// Sets the loop iteration ceiling
    pub fn with_max_loop_iterations(mut self, limit: usize) -> Self {
        self.max_loop_iterations = Some(limit);
        self
    }
}
