//! Compiler configuration.

use bindexpr_codegen::CodegenOptions;
use bindexpr_invert::DEFAULT_MAX_DEPTH;

/// Configuration for the [`BindingCompiler`](crate::BindingCompiler).
#[derive(Clone, Debug)]
pub struct CompilerConfig {
    /// Maximum length of the dynamic spine an inversion may walk.
    pub max_inversion_depth: usize,
    /// Prefix of generated setter names.
    pub setter_prefix: String,
    /// Initial node capacity of models created by the compiler.
    pub model_capacity: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_inversion_depth: DEFAULT_MAX_DEPTH,
            setter_prefix: "set".to_string(),
            model_capacity: 64,
        }
    }
}

impl CompilerConfig {
    /// Sets the maximum inversion depth.
    #[must_use]
    pub fn with_max_inversion_depth(mut self, depth: usize) -> Self {
        self.max_inversion_depth = depth;
        self
    }

    /// Sets the setter prefix.
    #[must_use]
    pub fn with_setter_prefix(mut self, prefix: &str) -> Self {
        self.setter_prefix = prefix.to_string();
        self
    }

    /// Sets the initial model capacity.
    #[must_use]
    pub fn with_model_capacity(mut self, capacity: usize) -> Self {
        self.model_capacity = capacity;
        self
    }

    /// Returns the code generation options implied by this configuration.
    #[must_use]
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            setter_prefix: self.setter_prefix.clone(),
        }
    }
}
