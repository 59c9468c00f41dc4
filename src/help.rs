//! Usage and help rendering
//!
//! Renders the parameter model into the `--help` text and normalizes
//! docstrings for display.

use crate::error::{ExtractError, ExtractResult};
use crate::model::{ParamSpec, TypeExpr, Value};

/// Render the full help text for a parameter set.
///
/// The usage line lists required parameters by help-name in declaration
/// order; the options section shows every parameter with its type,
/// description, printable default, and optionality.
pub fn help_text(filename: &str, params: &[ParamSpec], docstring: &str) -> String {
    let mut help_msg: Vec<String> = Vec::new();
    if !docstring.is_empty() {
        help_msg.push("Description:".to_string());
        help_msg.push(docstring.to_string());
        help_msg.push(String::new());
    }
    help_msg.push("Options:".to_string());

    let max_name_len = params
        .iter()
        .map(|p| p.help_name().len())
        .max()
        .unwrap_or(0);

    let mut positional: Vec<String> = Vec::new();
    for param in params {
        if param.is_required() {
            positional.push(param.help_name());
        }

        let help_name = param.help_name();
        let mut line = format!("  --{}", help_name);
        line.push_str(&" ".repeat(max_name_len - help_name.len() + 2));

        if let Some(rendered) = render_type(&param.annotation) {
            line.push_str(&format!(" {}", rendered));
        }
        if !param.description.is_empty() {
            line.push_str(&format!(" {}", param.description));
        }
        if let Some(default) = &param.default {
            if matches!(default, Value::Int(_) | Value::Float(_) | Value::Str(_)) {
                line.push_str(&format!(" (Default: {})", default));
            }
        }
        if param.is_optional() {
            line.push_str(" [OPTIONAL]");
        }
        help_msg.push(line);
    }

    let mut usage = format!("  {} ", filename);
    if !positional.is_empty() {
        usage.push_str(&format!("[{}]", positional.join("] [")));
    }

    let mut lines = vec!["Usage:".to_string(), usage, String::new()];
    lines.extend(help_msg);
    lines.join("\n")
}

/// The type column for one option line: `(int)` for scalars, the bracket
/// list for unions and sequences, nothing for internal parameters.
fn render_type(annotation: &TypeExpr) -> Option<String> {
    match annotation {
        TypeExpr::Unresolved => None,
        TypeExpr::Union(_) | TypeExpr::List(_) | TypeExpr::Set(_) => Some(annotation.help_type()),
        scalar => Some(format!("({})", scalar.help_type())),
    }
}

/// Normalize a docstring for display: drop blank edge lines and remove the
/// common indentation of the remaining lines.
///
/// Tab characters are rejected outright rather than guessed at.
pub fn format_docstring(docstring: &str) -> ExtractResult<String> {
    if docstring.contains('\t') {
        return Err(ExtractError::TabsInDocstring);
    }

    let lines: Vec<&str> = docstring.lines().collect();
    let first = match lines.iter().position(|l| !l.trim().is_empty()) {
        Some(index) => index,
        None => return Ok(String::new()),
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);

    let indent = lines[first..=last]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let aligned: Vec<&str> = lines[first..=last]
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { l.trim_start() })
        .collect();
    Ok(aligned.join("\n"))
}
