//! Per-parameter records
//!
//! `ParamSpec` is the resolved model of one declared parameter: its type,
//! default, harvested description, requiredness, and (after binding) its
//! concrete value.

use crate::error::{BindError, BindResult};
use crate::lexer;
use crate::model::{TypeExpr, Value};
use std::fmt;

/// A raw command-line value on its way into a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    /// An explicit textual value (`--name=value` or a positional token)
    Text(&'a str),

    /// A bare `--name` flag with no attached value
    Flag,
}

/// The resolved model of one declared parameter
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Identifier, unique within a signature
    pub name: String,

    /// Declared type
    pub annotation: TypeExpr,

    /// Declared default, when one was recognized
    pub default: Option<Value>,

    /// Free text harvested from a comment
    pub description: String,

    /// Synthesized parameters (`help`, `version`) never passed to the entry point
    pub internal: bool,

    /// Declaration line, kept for diagnostics
    pub line: String,

    /// Explicit optionality override; `None` derives from the annotation
    optional: Option<bool>,

    /// Requiredness fallback once no derivation rule applies
    required: bool,

    /// Resolved value after binding; unset until bound
    value: Option<Value>,
}

impl ParamSpec {
    /// Create a parameter with a declared type
    pub fn new(name: impl Into<String>, annotation: TypeExpr) -> Self {
        ParamSpec {
            name: name.into(),
            annotation,
            default: None,
            description: String::new(),
            internal: false,
            line: String::new(),
            optional: None,
            required: true,
            value: None,
        }
    }

    /// Create a synthesized internal parameter (`help`, `version`)
    pub fn internal(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut param = Self::new(name, TypeExpr::Unresolved);
        param.description = description.into();
        param.internal = true;
        param
    }

    /// Attach a declared default
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the declaration source line
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = line.into();
        self
    }

    /// Override the requiredness fallback
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Override derived optionality
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    /// The flag-friendly rendering of the name: underscores become hyphens
    pub fn help_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// The type rendering used in help and error text
    pub fn help_type(&self) -> String {
        self.annotation.help_type()
    }

    /// Whether a value must be supplied for binding to succeed
    pub fn is_required(&self) -> bool {
        // Internal-only params never require a value
        if self.internal {
            return false;
        }

        // Optional implies no required value
        if self.is_optional() {
            return false;
        }

        // Existence of a default value implies no required value
        if self.default.is_some() {
            return false;
        }

        // Booleans are always satisfiable: absent means false
        if self.annotation.includes_bool() {
            return false;
        }

        self.required
    }

    /// Whether the declared type is exactly a two-member union with None
    pub fn is_optional(&self) -> bool {
        if let Some(explicit) = self.optional {
            return explicit;
        }
        match &self.annotation {
            TypeExpr::Union(members) => {
                members.len() == 2 && members.contains(&TypeExpr::NoneType)
            }
            _ => false,
        }
    }

    /// The value handed to the entry point: bound value if set, else the
    /// default, else `false` for bool-typed parameters, else `None` for
    /// optional parameters. Returns `None` only when no rule produces a
    /// value, which requiredness checks rule out for non-internal params.
    pub fn value(&self) -> Option<Value> {
        if let Some(value) = &self.value {
            return Some(value.clone());
        }
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        if self.annotation.includes_bool() {
            return Some(Value::Bool(false));
        }
        if self.is_optional() {
            return Some(Value::None);
        }
        None
    }

    /// Whether a bound value has been set
    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }

    /// Set the description from a comment, stripping the `# ` marker.
    ///
    /// Without `force`, an existing description is kept.
    pub fn set_description(&mut self, comment: &str, force: bool) {
        if !self.description.is_empty() && !force {
            return;
        }
        self.description = strip_comment_marker(comment);
    }

    /// Re-scan a declaration line for an inline comment, falling back to a
    /// pending prepended comment.
    ///
    /// Returns true when the line itself carried a comment and scanned
    /// cleanly. Without `overwrite`, a parameter that already has a
    /// description is left alone.
    pub fn parse_or_prepend(
        &mut self,
        line: &str,
        pending: Option<&str>,
        overwrite: bool,
    ) -> bool {
        if !overwrite && !self.description.is_empty() {
            return false;
        }

        let (comment, clean) = lexer::line_comment(line);
        let mut line_set = false;
        if let Some(text) = comment {
            self.set_description(&text, true);
            line_set = clean;
        }
        if let Some(text) = pending {
            self.set_description(text, false);
        }
        line_set
    }

    /// Whether any constituent type accepts the raw string
    pub fn validate(&self, raw: &str) -> bool {
        self.annotation.accepts(raw)
    }

    /// Bind a single raw value, coercing it to the declared type.
    pub fn set_value(&mut self, raw: RawValue<'_>) -> BindResult<()> {
        match raw {
            RawValue::Flag => {
                if !self.annotation.includes_bool() {
                    return Err(BindError::RequiresValue {
                        name: self.help_name(),
                    });
                }
                let flagged = match &self.default {
                    None => true,
                    Some(default) => !default.is_truthy(),
                };
                self.value = Some(Value::Bool(flagged));
                Ok(())
            }
            RawValue::Text(text) => {
                if !self.validate(text) {
                    return Err(self.type_error());
                }
                match &self.annotation {
                    TypeExpr::List(_) | TypeExpr::Set(_) => {
                        self.set_value_seq(&[text.to_string()])
                    }
                    annotation => {
                        // First constituent type that parses wins
                        let coerced = annotation
                            .datatypes()
                            .iter()
                            .filter(|t| ***t != TypeExpr::NoneType)
                            .find_map(|t| t.coerce_scalar(text));
                        match coerced {
                            Some(value) => {
                                self.value = Some(value);
                                Ok(())
                            }
                            None => Err(self.type_error()),
                        }
                    }
                }
            }
        }
    }

    /// Bind a whole positional sequence onto a list/set parameter.
    pub fn set_value_seq(&mut self, values: &[String]) -> BindResult<()> {
        let (element, dedup) = match &self.annotation {
            TypeExpr::List(element) => (element.as_ref().clone(), false),
            TypeExpr::Set(element) => (element.as_ref().clone(), true),
            _ => return Err(self.type_error()),
        };

        let mut coerced = Vec::with_capacity(values.len());
        for raw in values {
            match element.coerce_scalar(raw) {
                Some(value) => {
                    if !dedup || !coerced.contains(&value) {
                        coerced.push(value);
                    }
                }
                None => return Err(self.type_error()),
            }
        }

        self.value = Some(if dedup {
            Value::Set(coerced)
        } else {
            Value::List(coerced)
        });
        Ok(())
    }

    fn type_error(&self) -> BindError {
        BindError::Validation {
            name: self.help_name(),
            types: self.help_type(),
        }
    }
}

impl PartialEq for ParamSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.default == other.default
            && self.is_required() == other.is_required()
            && self.is_optional() == other.is_optional()
            && self.value == other.value
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default = match &self.default {
            Some(v) => format!("'{}'", v),
            None => "Empty".to_string(),
        };
        let value = match &self.value {
            Some(v) => format!("'{}'", v),
            None => "Empty".to_string(),
        };
        write!(
            f,
            "{}: annotation={} description='{}' default={} required={} optional={} value={}",
            self.name,
            self.help_type(),
            self.description,
            default,
            self.is_required(),
            self.is_optional(),
            value,
        )
    }
}

/// Strip a leading `# ` from comment text and trim the result.
///
/// A `#` not followed by whitespace is kept verbatim.
fn strip_comment_marker(comment: &str) -> String {
    let text = comment.trim_start();
    if let Some(rest) = text.strip_prefix('#') {
        let trimmed = rest.trim_start();
        if trimmed.len() != rest.len() {
            return trimmed.trim_end().to_string();
        }
    }
    text.trim_end().to_string()
}
