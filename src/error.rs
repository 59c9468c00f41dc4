//! Error types for clisig

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for clisig operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Main error type for clisig
#[derive(Error, Debug)]
pub enum CliError {
    /// Signature extraction errors
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// Argument binding errors
    #[error("{0}")]
    Bind(#[from] BindError),

    /// Tokenization errors
    #[error("{0}")]
    Tokenize(#[from] TokenizeError),

    /// A second entry point was registered in the same process
    #[error("Error: only one entry point may be bound per process")]
    DuplicateBinding,
}

/// Tokenization errors
///
/// These are local and recoverable: callers degrade to "no description or
/// default available for this line" instead of aborting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated string literal starting on line {line}")]
    UnterminatedString { line: usize },

    #[error("unbalanced bracket on line {line}")]
    UnbalancedBracket { line: usize },
}

/// Signature extraction errors (fatal, pre-flight)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error(
        "File \"{file}\", line {line}\n{source_line}\nMissingTypeAnnotation: parameter '{name}' needs a type hint"
    )]
    MissingTypeAnnotation {
        file: String,
        line: usize,
        source_line: String,
        name: String,
    },

    #[error("File \"{file}\", line {line}\n{source_line}\nUnsupportedType: {annotation}")]
    UnsupportedType {
        file: String,
        line: usize,
        source_line: String,
        annotation: String,
    },

    #[error("only one sequence parameter (list or set) is supported; '{0}' is the second")]
    MultipleSequenceParams(String),

    #[error("tabs are not supported in description text; replace them with spaces")]
    TabsInDocstring,

    #[error("Failed to read signature file '{path}': {error}")]
    SignatureFile { path: PathBuf, error: String },
}

/// One missing required parameter, as reported to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParam {
    pub help_name: String,
    pub description: String,
}

/// Argument binding errors (fatal but user-facing)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("'{name}' must be of type {types}")]
    Validation { name: String, types: String },

    #[error("'{name}' requires a value")]
    RequiresValue { name: String },

    #[error("Too many positional arguments!")]
    TooManyPositional,

    #[error("Error: Unexpected argument '{0}'")]
    Unexpected(String),

    #[error("{}", missing_params_msg(.0))]
    MissingRequired(Vec<MissingParam>),
}

/// Specialized result type for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Specialized result type for binding operations
pub type BindResult<T> = std::result::Result<T, BindError>;

/// Specialized result type for tokenization operations
pub type TokenizeResult<T> = std::result::Result<T, TokenizeError>;

/// Render the aggregated missing-required-arguments message
fn missing_params_msg(missing: &[MissingParam]) -> String {
    let plural = if missing.len() > 1 { "s" } else { "" };
    let mut lines = vec![format!("Error, missing required argument{}:", plural)];
    for param in missing {
        let mut line = format!("  --{}", param.help_name);
        if !param.description.is_empty() {
            line.push_str(&format!("  {}", param.description));
        }
        lines.push(line);
    }
    lines.join("\n")
}
