//! Declared parameter types
//!
//! Parses annotation source text into the closed set of supported type
//! expressions and provides scalar coercion for raw argument strings.

use crate::model::Value;
use std::fmt;

/// A supported declared type.
///
/// Scalars, homogeneous lists/sets of scalars, and unions/optionals of
/// scalars are representable; any other annotation is a declaration-time
/// error surfaced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Bool,
    Int,
    Float,
    Str,

    /// The "no value" member of an optional/union type
    NoneType,

    /// `list[T]` for a scalar T
    List(Box<TypeExpr>),

    /// `set[T]` for a scalar T
    Set(Box<TypeExpr>),

    /// `Union[...]`, `A | B`, or `Optional[T]` (a two-member union with None)
    Union(Vec<TypeExpr>),

    /// No annotation; only synthesized internal parameters carry this
    Unresolved,
}

impl TypeExpr {
    /// Parse annotation source text.
    ///
    /// Accepts the spellings `bool`, `int`, `float`, `str`, `None`,
    /// `Optional[T]`, `Union[A, B]`, `A | B`, `list[T]`, and `set[T]`.
    /// Returns `None` for anything outside the supported set.
    pub fn parse(text: &str) -> Option<TypeExpr> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        // Pipe unions first: they have the lowest precedence
        let members = split_top_level(text, '|');
        if members.len() > 1 {
            let parsed: Option<Vec<TypeExpr>> =
                members.iter().map(|m| Self::parse_member(m)).collect();
            return Some(TypeExpr::Union(parsed?));
        }

        if let Some(inner) = bracketed(text, "Optional") {
            let member = Self::parse_scalar(inner.trim())?;
            return Some(TypeExpr::Union(vec![member, TypeExpr::NoneType]));
        }

        if let Some(inner) = bracketed(text, "Union") {
            let members = split_top_level(inner, ',');
            let parsed: Option<Vec<TypeExpr>> =
                members.iter().map(|m| Self::parse_member(m)).collect();
            let mut parsed = parsed?;
            if parsed.is_empty() {
                return None;
            }
            if parsed.len() == 1 {
                return Some(parsed.remove(0));
            }
            return Some(TypeExpr::Union(parsed));
        }

        if let Some(inner) = bracketed(text, "list") {
            let element = Self::parse_scalar(inner.trim())?;
            return Some(TypeExpr::List(Box::new(element)));
        }

        if let Some(inner) = bracketed(text, "set") {
            let element = Self::parse_scalar(inner.trim())?;
            return Some(TypeExpr::Set(Box::new(element)));
        }

        Self::parse_member(text)
    }

    /// A union member: a scalar or the None type
    fn parse_member(text: &str) -> Option<TypeExpr> {
        let text = text.trim();
        match text {
            "None" | "NoneType" => Some(TypeExpr::NoneType),
            _ => Self::parse_scalar(text),
        }
    }

    /// A bare scalar type name
    fn parse_scalar(text: &str) -> Option<TypeExpr> {
        match text {
            "bool" => Some(TypeExpr::Bool),
            "int" => Some(TypeExpr::Int),
            "float" => Some(TypeExpr::Float),
            "str" => Some(TypeExpr::Str),
            _ => None,
        }
    }

    /// The constituent types considered during validation and coercion:
    /// union members, the element type for sequences, or the type itself.
    pub fn datatypes(&self) -> Vec<&TypeExpr> {
        match self {
            TypeExpr::Union(members) => members.iter().collect(),
            TypeExpr::List(element) | TypeExpr::Set(element) => vec![element],
            TypeExpr::Unresolved => vec![],
            other => vec![other],
        }
    }

    /// Whether bool is among the constituent types
    pub fn includes_bool(&self) -> bool {
        self.datatypes().contains(&&TypeExpr::Bool)
    }

    /// Whether this is a `list` or `set` type
    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeExpr::List(_) | TypeExpr::Set(_))
    }

    /// The scalar name used in help and error text
    fn scalar_name(&self) -> &'static str {
        match self {
            TypeExpr::Bool => "bool",
            TypeExpr::Int => "int",
            TypeExpr::Float => "float",
            TypeExpr::Str => "str",
            TypeExpr::NoneType => "NoneType",
            TypeExpr::List(_) => "list",
            TypeExpr::Set(_) => "set",
            TypeExpr::Union(_) => "union",
            TypeExpr::Unresolved => "",
        }
    }

    /// Render the type for help and error messages: `int` for scalars,
    /// `[str, int]` for unions and sequences.
    pub fn help_type(&self) -> String {
        match self {
            TypeExpr::Union(_) | TypeExpr::List(_) | TypeExpr::Set(_) => {
                let names: Vec<&str> = self.datatypes().iter().map(|t| t.scalar_name()).collect();
                format!("[{}]", names.join(", "))
            }
            other => other.scalar_name().to_string(),
        }
    }

    /// Attempt to coerce a raw argument string with this scalar type.
    ///
    /// Non-scalar types and the None type never coerce a string.
    pub fn coerce_scalar(&self, raw: &str) -> Option<Value> {
        match self {
            TypeExpr::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            TypeExpr::Int => raw.parse::<i64>().ok().map(Value::Int),
            TypeExpr::Float => raw.parse::<f64>().ok().map(Value::Float),
            TypeExpr::Str => Some(Value::Str(raw.to_string())),
            _ => None,
        }
    }

    /// Whether any non-None constituent type accepts the raw string
    pub fn accepts(&self, raw: &str) -> bool {
        self.datatypes()
            .iter()
            .filter(|t| ***t != TypeExpr::NoneType)
            .any(|t| t.coerce_scalar(raw).is_some())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.help_type())
    }
}

/// Strip `prefix[` and the matching trailing `]`
fn bracketed<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.strip_prefix(prefix)?
        .trim_start()
        .strip_prefix('[')?
        .strip_suffix(']')
}

/// Split on a separator character, ignoring separators inside brackets
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
