//! clisig - derive a command-line interface from a typed function signature
//!
//! clisig builds a full CLI (typed positional and `--name=value` arguments,
//! generated `--help`, optional `--version`) from a single annotated
//! parameter list, including the `#` comment descriptions written next to
//! each parameter.

// Public modules
pub mod bind;
pub mod cli;
pub mod error;
pub mod extract;
pub mod help;
pub mod lexer;
pub mod model;

// Re-export commonly used types
pub use bind::{clean_args, BoundArgs, FromArgValue};
pub use cli::{run, App, Outcome, Registry};
pub use error::{CliError, Result};
pub use model::{ParamSpec, TypeExpr, Value};

/// Current version of clisig
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
