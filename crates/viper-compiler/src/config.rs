//! Code generation options.

/// Options controlling code generation and sequence finalization.
///
/// ```
/// use viper_compiler::CodegenConfig;
///
/// let config = CodegenConfig::new()
///     .with_retain_unused_labels(false)
///     .with_implicit_return(false);
/// assert!(config.emit_resume);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Keep markers for labels that no jump references.
    pub retain_unused_labels: bool,
    /// Start every unit with a `RESUME` marker at line 0.
    pub emit_resume: bool,
    /// End function bodies with `RETURN_CONST None`.
    pub implicit_return: bool,
}

impl CodegenConfig {
    pub fn new() -> Self {
        Self {
            retain_unused_labels: true,
            emit_resume: true,
            implicit_return: true,
        }
    }

    pub fn with_retain_unused_labels(mut self, retain: bool) -> Self {
        self.retain_unused_labels = retain;
        self
    }

    pub fn with_emit_resume(mut self, emit: bool) -> Self {
        self.emit_resume = emit;
        self
    }

    pub fn with_implicit_return(mut self, implicit: bool) -> Self {
        self.implicit_return = implicit;
        self
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self::new()
    }
}
