//! Structural signature reading
//!
//! The first of the two extraction passes: parse the declaration list into
//! ordered parameter names, annotation text, and literal defaults, without
//! looking at comments. The comment-binding pass in the parent module merges
//! its findings into these records by name.

use crate::error::{ExtractError, ExtractResult};
use crate::extract::at_declaration_position;
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::model::Value;

/// One structurally parsed declaration
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecl {
    pub name: String,
    pub annotation: String,
    pub default: Option<Value>,
    pub line_no: usize,
    pub line: String,
}

/// The structural half of a signature: declarations plus an optional
/// leading docstring
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub docstring: Option<String>,
    pub decls: Vec<RawDecl>,
}

enum State {
    ExpectName,
    AfterName,
    InAnnotation,
    InDefault,
}

/// Parse the declaration list of a signature.
///
/// Accepts a bare parameter list or one wrapped in a single pair of
/// parentheses. A declaration without a type annotation is a fatal error;
/// tokenization failures end the parse early with whatever was recovered.
pub fn read(source: &str, origin: &str) -> ExtractResult<Structure> {
    let tokens: Vec<Token> = Tokenizer::new(source)
        .take_while(Result::is_ok)
        .filter_map(Result::ok)
        .collect();

    let mut structure = Structure::default();
    let mut state = State::ExpectName;
    let mut depth = 0usize;
    let mut base_depth = 0usize;
    let mut seen_decl = false;

    // Current declaration being assembled
    let mut name = String::new();
    let mut name_token: Option<Token> = None;
    let mut annotation = String::new();
    let mut default_tokens: Vec<Token> = Vec::new();

    let finalize = |name: &mut String,
                        name_token: &mut Option<Token>,
                        annotation: &mut String,
                        default_tokens: &mut Vec<Token>,
                        decls: &mut Vec<RawDecl>| {
        let token = match name_token.take() {
            Some(token) => token,
            None => return,
        };
        decls.push(RawDecl {
            name: std::mem::take(name),
            annotation: std::mem::take(annotation),
            default: parse_default(&std::mem::take(default_tokens)),
            line_no: token.line_no,
            line: token.line,
        });
    };

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        index += 1;

        // Bracket bookkeeping applies in every state
        if token.kind == TokenKind::Other {
            match token.text.as_str() {
                "(" | "[" | "{" => {
                    // An outer paren wrapping the whole list is transparent
                    if depth == 0 && !seen_decl && matches!(state, State::ExpectName) {
                        base_depth = 1;
                    }
                    depth += 1;
                }
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    if depth < base_depth {
                        // Closed the wrapping paren: the list is over
                        finalize(
                            &mut name,
                            &mut name_token,
                            &mut annotation,
                            &mut default_tokens,
                            &mut structure.decls,
                        );
                        return check_annotations(structure, origin);
                    }
                }
                _ => {}
            }
        }

        match state {
            State::ExpectName => match token.kind {
                TokenKind::Name => {
                    name = token.text.clone();
                    name_token = Some(token.clone());
                    seen_decl = true;
                    state = State::AfterName;
                }
                TokenKind::Str if !seen_decl && structure.docstring.is_none() => {
                    structure.docstring = Some(token.string_value());
                }
                _ => {}
            },
            State::AfterName => match (token.kind, token.text.as_str()) {
                (TokenKind::Other, ":") => {
                    annotation.clear();
                    state = State::InAnnotation;
                }
                (TokenKind::Comment, _) | (TokenKind::Newline, _) => {}
                _ => {
                    let token = name_token.take().unwrap_or_else(|| token.clone());
                    return Err(ExtractError::MissingTypeAnnotation {
                        file: origin.to_string(),
                        line: token.line_no,
                        source_line: token.line,
                        name: std::mem::take(&mut name),
                    });
                }
            },
            State::InAnnotation => match (token.kind, token.text.as_str()) {
                (TokenKind::Other, "=") if depth == base_depth => {
                    default_tokens.clear();
                    state = State::InDefault;
                }
                (TokenKind::Other, ",") if depth == base_depth => {
                    finalize(
                        &mut name,
                        &mut name_token,
                        &mut annotation,
                        &mut default_tokens,
                        &mut structure.decls,
                    );
                    state = State::ExpectName;
                }
                (TokenKind::Comment, _)
                | (TokenKind::Newline, _)
                | (TokenKind::LogicalEnd, _) => {}
                (TokenKind::Name, _)
                    if depth == base_depth && at_declaration_position(&tokens, index) =>
                {
                    // A missing comma: the next declaration starts here
                    finalize(
                        &mut name,
                        &mut name_token,
                        &mut annotation,
                        &mut default_tokens,
                        &mut structure.decls,
                    );
                    name = token.text.clone();
                    name_token = Some(token.clone());
                    state = State::AfterName;
                }
                _ => annotation.push_str(&token.text),
            },
            State::InDefault => match (token.kind, token.text.as_str()) {
                (TokenKind::Other, ",") if depth == base_depth => {
                    finalize(
                        &mut name,
                        &mut name_token,
                        &mut annotation,
                        &mut default_tokens,
                        &mut structure.decls,
                    );
                    state = State::ExpectName;
                }
                (TokenKind::Comment, _)
                | (TokenKind::Newline, _)
                | (TokenKind::LogicalEnd, _) => {}
                (TokenKind::Name, _)
                    if depth == base_depth && at_declaration_position(&tokens, index) =>
                {
                    finalize(
                        &mut name,
                        &mut name_token,
                        &mut annotation,
                        &mut default_tokens,
                        &mut structure.decls,
                    );
                    name = token.text.clone();
                    name_token = Some(token.clone());
                    state = State::AfterName;
                }
                _ => default_tokens.push(token.clone()),
            },
        }
    }

    if matches!(state, State::AfterName) {
        let token = name_token.take();
        let (line_no, line) = token
            .map(|t| (t.line_no, t.line))
            .unwrap_or((1, String::new()));
        return Err(ExtractError::MissingTypeAnnotation {
            file: origin.to_string(),
            line: line_no,
            source_line: line,
            name,
        });
    }

    finalize(
        &mut name,
        &mut name_token,
        &mut annotation,
        &mut default_tokens,
        &mut structure.decls,
    );
    check_annotations(structure, origin)
}

/// Ensure every declaration carries annotation text.
///
/// Type support itself is checked by the caller, which owns the mapping
/// into the type model.
fn check_annotations(structure: Structure, origin: &str) -> ExtractResult<Structure> {
    for decl in &structure.decls {
        if decl.annotation.trim().is_empty() {
            return Err(ExtractError::MissingTypeAnnotation {
                file: origin.to_string(),
                line: decl.line_no,
                source_line: decl.line.clone(),
                name: decl.name.clone(),
            });
        }
    }
    Ok(structure)
}

/// Interpret a default's token run as a literal value.
///
/// Recognized literals: optionally signed numbers, strings, `True`,
/// `False`, and `None`. Anything more elaborate is treated as absent.
fn parse_default(tokens: &[Token]) -> Option<Value> {
    match tokens {
        [t] if t.kind == TokenKind::Number => parse_number(&t.text, false),
        [sign, t] if sign.text == "-" && t.kind == TokenKind::Number => {
            parse_number(&t.text, true)
        }
        [t] if t.kind == TokenKind::Str => Some(Value::Str(t.string_value())),
        [t] if t.kind == TokenKind::Name => match t.text.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::None),
            _ => None,
        },
        _ => None,
    }
}

fn parse_number(text: &str, negative: bool) -> Option<Value> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if cleaned.contains(['.', 'e', 'E']) {
        let value: f64 = cleaned.parse().ok()?;
        Some(Value::Float(if negative { -value } else { value }))
    } else {
        let value: i64 = cleaned.parse().ok()?;
        Some(Value::Int(if negative { -value } else { value }))
    }
}
