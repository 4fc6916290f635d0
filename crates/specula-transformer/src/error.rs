/// Error and diagnostic types for the reflection transformer

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

/// Hard failures of the transformer.
///
/// Shape problems in a single reflector or capability literal are *not*
/// errors at this level; they become diagnostics and the affected artifact is
/// abandoned. An `Invariant` aborts the whole `transform` call: the World it
/// came from is unusable and must never feed the generator.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("capability kind `{0}` is recognized but not yet supported")]
    NotYetSupported(String),

    #[error("shape error in {module}: {message}")]
    Shape { module: String, message: String },

    #[error("overlapping edits at offset {offset} in {module}")]
    EditOverlap { module: String, offset: usize },

    #[error("edit at offset {offset} is outside the source of {module}")]
    EditOutOfBounds { module: String, offset: usize },

    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl TransformError {
    pub fn invariant(message: impl Into<String>) -> Self {
        TransformError::Invariant(message.into())
    }

    pub fn shape(module: impl Into<String>, message: impl Into<String>) -> Self {
        TransformError::Shape {
            module: module.into(),
            message: message.into(),
        }
    }
}

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A diagnostic tagged with a source location, reported alongside the
/// transformed output. Formatting and transport belong to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short name of the module the diagnostic refers to.
    pub module: String,
    /// Byte offset into the module source, when one is known.
    pub offset: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(module: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            module: module.into(),
            offset: None,
            message: message.into(),
        }
    }

    pub fn warning(module: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            module: module.into(),
            offset: None,
            message: message.into(),
        }
    }

    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.offset {
            Some(offset) => write!(f, "{}: {}@{}: {}", tag, self.module, offset, self.message),
            None => write!(f, "{}: {}: {}", tag, self.module, self.message),
        }
    }
}
