//! Argument binding
//!
//! Maps raw process arguments onto the parameter model: partitions argv into
//! positional and named tokens, binds each parameter in declaration order
//! with type coercion, and aggregates the user-facing failures.

use crate::error::{BindError, BindResult, MissingParam};
use crate::model::{ParamSpec, RawValue, Value};
use regex::Regex;
use std::sync::OnceLock;

/// A named token's payload: an explicit value, or a bare flag
type NamedValue = Option<String>;

/// Raw process arguments split into positional and named forms
#[derive(Debug, Clone, Default)]
pub struct CleanArgs {
    /// Positional tokens, in order
    pub positional: Vec<String>,

    /// Named tokens in first-appearance order; a repeated name keeps its
    /// position and takes the latest value
    pub named: Vec<(String, NamedValue)>,
}

impl CleanArgs {
    /// Whether a named token with this (underscore-form) name was supplied
    pub fn has_named(&self, name: &str) -> bool {
        self.named.iter().any(|(key, _)| key == name)
    }

    fn named_value(&self, name: &str) -> Option<&NamedValue> {
        self.named
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

fn named_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--([\w-]+)(?:=(.+))?").expect("static regex"))
}

/// Partition raw argv tokens.
///
/// A token matching `--name` or `--name=value` is named (hyphens in the
/// name translate to underscores); everything else is positional. A bare
/// `--name` carries no value and later binds through flag semantics.
pub fn clean_args<S: AsRef<str>>(argv: &[S]) -> CleanArgs {
    let mut clean = CleanArgs::default();
    for arg in argv {
        let arg = arg.as_ref();
        let captures = match named_token_re().captures(arg) {
            Some(captures) => captures,
            None => {
                clean.positional.push(arg.to_string());
                continue;
            }
        };
        let name = captures[1].replace('-', "_");
        let value = captures.get(2).map(|m| m.as_str().to_string());
        match clean.named.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => clean.named.push((name, value)),
        }
    }
    clean
}

/// The final keyword-argument set handed to the entry point
#[derive(Debug, Clone, Default)]
pub struct BoundArgs {
    values: Vec<(String, Value)>,
}

impl BoundArgs {
    /// Look up a bound value by parameter name
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Look up and convert a bound value.
    ///
    /// Returns `None` when the name is unknown or the value does not
    /// convert to the requested type.
    pub fn get<T: FromArgValue>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(T::from_arg_value)
    }

    /// Iterate over name/value pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Conversion from a bound [`Value`] into a caller-facing type
pub trait FromArgValue: Sized {
    fn from_arg_value(value: &Value) -> Option<Self>;
}

impl FromArgValue for bool {
    fn from_arg_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromArgValue for i64 {
    fn from_arg_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromArgValue for f64 {
    fn from_arg_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl FromArgValue for String {
    fn from_arg_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl<T: FromArgValue> FromArgValue for Vec<T> {
    fn from_arg_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(values) | Value::Set(values) => {
                values.iter().map(T::from_arg_value).collect()
            }
            _ => None,
        }
    }
}

impl<T: FromArgValue> FromArgValue for Option<T> {
    fn from_arg_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(None),
            other => T::from_arg_value(other).map(Some),
        }
    }
}

/// Bind cleaned process arguments onto the parameter set.
///
/// Parameters bind in declaration order. A list/set parameter greedily
/// consumes every remaining positional token; positional tokens take
/// precedence over a named token for the same parameter. Failures follow
/// a fixed precedence: coercion errors are immediate, then leftover
/// positionals, then the aggregated missing-required report, then unknown
/// named tokens.
pub fn bind(params: &mut [ParamSpec], args: &CleanArgs) -> BindResult<BoundArgs> {
    let mut positional = args.positional.clone();
    let mut missing: Vec<MissingParam> = Vec::new();

    for param in params.iter_mut() {
        if param.annotation.is_sequence() {
            // Consume ALL remaining positionals for a list or set
            param.set_value_seq(&positional)?;
            positional.clear();
        } else if !positional.is_empty() {
            let value = positional.remove(0);
            param.set_value(RawValue::Text(&value))?;
        } else if let Some(named) = args.named_value(&param.name) {
            match named {
                Some(value) => param.set_value(RawValue::Text(value))?,
                None => param.set_value(RawValue::Flag)?,
            }
        } else if param.is_required() {
            missing.push(MissingParam {
                help_name: param.help_name(),
                description: param.description.clone(),
            });
        }
    }

    if !positional.is_empty() {
        return Err(BindError::TooManyPositional);
    }

    if !missing.is_empty() {
        return Err(BindError::MissingRequired(missing));
    }

    // Any named token that matches no parameter is fatal
    for (name, _) in &args.named {
        if !params.iter().any(|p| p.name == *name) {
            return Err(BindError::Unexpected(name.clone()));
        }
    }

    let values = params
        .iter()
        .map(|param| {
            let value = param
                .value()
                .expect("requiredness rules guarantee a value or default");
            (param.name.clone(), value)
        })
        .collect();

    Ok(BoundArgs { values })
}
