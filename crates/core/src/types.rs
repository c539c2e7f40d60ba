use serde_json::Value;

/// Global flags parsed once before routing. They apply uniformly to every
/// downstream component and are never plugin-specific. The `--config`
/// path is consumed during resolution and does not travel further.
#[derive(Debug, Clone, Default)]
pub struct GlobalFlags {
    pub verbose: bool,
    pub debug: bool,
}

/// Normalized outcome of one dispatched command.
///
/// Produced by exactly one of the passthrough executor or a plugin and
/// consumed by the process exit path.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub exit_code: i32,
    /// Structured summary (build duration, cleaned directories, ...) for
    /// callers that want more than an exit code.
    pub summary: Option<Value>,
}

impl DispatchResult {
    pub fn success() -> Self {
        Self::code(0)
    }

    pub fn code(exit_code: i32) -> Self {
        Self {
            exit_code,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
