//! Naming conventions a session compiles with.

/// Plain compiler settings carried by a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Source file extension, without the dot.
    pub extension: String,
    /// Source name of the builtin module.
    pub std_module: String,
    /// Generated (host) name of the builtin module.
    pub std_generated: String,
    /// Prefix for every generated module name.
    pub output_prefix: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            extension: "fleaux".into(),
            std_module: "Std".into(),
            std_generated: "fleaux_std_lib".into(),
            output_prefix: "fleaux_generated_module_".into(),
        }
    }
}

impl CompilerOptions {
    /// Generated name for a compiled source module.
    ///
    /// ```
    /// use fleaux_compiler::CompilerOptions;
    ///
    /// let options = CompilerOptions::default();
    /// assert_eq!(options.generated_name("Geometry"), "fleaux_generated_module_Geometry");
    /// ```
    pub fn generated_name(&self, module: &str) -> String {
        format!("{}{}", self.output_prefix, module)
    }

    /// File name a source module is loaded from.
    pub fn source_file(&self, module: &str) -> String {
        format!("{}.{}", module, self.extension)
    }
}
