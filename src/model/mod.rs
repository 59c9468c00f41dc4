//! The typed parameter model
//!
//! This module defines the data structures that represent one declared
//! parameter of an entry-point signature: its runtime value, its declared
//! type, and the full per-parameter record built by extraction and consumed
//! by binding.

mod param;
mod types;
mod value;

pub use param::{ParamSpec, RawValue};
pub use types::TypeExpr;
pub use value::Value;
