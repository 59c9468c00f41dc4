//! Signature extraction
//!
//! Builds the parameter model for an entry-point signature by merging two
//! independent reads of the same source text: a structural pass over the
//! declaration list (names, annotations, literal defaults) and a linear
//! token walk that attaches `#` comment descriptions to the declarations
//! they belong to.

mod signature;

pub use signature::{read as read_structure, RawDecl, Structure};

use crate::error::{ExtractError, ExtractResult};
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::model::{ParamSpec, TypeExpr};

/// Origin label used when a signature does not come from a file
pub const ANONYMOUS_ORIGIN: &str = "<signature>";

/// The result of extracting a signature
#[derive(Debug, Clone)]
pub struct Extraction {
    /// One spec per declared parameter, in declaration order
    pub params: Vec<ParamSpec>,

    /// Leading triple-quoted docstring, when present
    pub docstring: Option<String>,
}

/// Extract the full parameter model from signature source text.
///
/// `origin` names the source in error reports (a file path, or
/// [`ANONYMOUS_ORIGIN`]).
pub fn extract(source: &str, origin: &str) -> ExtractResult<Extraction> {
    let structure = signature::read(source, origin)?;
    let docstring = structure.docstring.clone();
    let mut remaining = build_specs(&structure, origin)?;

    // Comment-binding pass: walk the tokens, opening a parameter at each
    // declaration-position name and closing it once its description is
    // settled. Tokenization failure ends the walk with whatever was bound.
    let tokens: Vec<Token> = Tokenizer::new(source)
        .take_while(Result::is_ok)
        .filter_map(Result::ok)
        .collect();

    let mut pending: Option<String> = None;
    let mut open: Option<ParamSpec> = None;
    let mut done: Vec<ParamSpec> = Vec::new();

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        index += 1;

        match token.kind {
            TokenKind::Comment => {
                let text = token.text.clone();
                if open.is_none() && !done.is_empty() {
                    // Trailing comment after a closed declaration
                    if let Some(last) = done.last_mut() {
                        last.parse_or_prepend(&token.line, Some(&text), true);
                    }
                    pending = None;
                } else if let Some(param) = open.as_mut() {
                    param.parse_or_prepend(&token.line, Some(&text), false);
                    pending = Some(text);
                } else {
                    pending = Some(text);
                }
                continue;
            }
            TokenKind::Newline | TokenKind::LogicalEnd => {
                // A physical line end closes the open parameter after one
                // more look at the finished line
                match open.as_mut() {
                    Some(param) => {
                        param.parse_or_prepend(&token.line, pending.as_deref(), true);
                    }
                    None => continue,
                }
            }
            TokenKind::Name => {
                let position = find_param(&remaining, &token.text);
                let at_decl = position.is_some() && at_declaration_position(&tokens, index);
                match position {
                    Some(found) if at_decl => {
                        if let Some(param) = open.take() {
                            pending = None;
                            done.push(param);
                        }
                        let mut param = remaining.remove(found);
                        if !param.parse_or_prepend(&token.line, pending.as_deref(), true) {
                            // No inline comment yet: stay open in case the
                            // declaration continues on further lines
                            open = Some(param);
                            continue;
                        }
                        open = Some(param);
                    }
                    _ => continue,
                }
            }
            _ => continue,
        }

        pending = None;
        if let Some(param) = open.take() {
            done.push(param);
        }
    }

    if let Some(param) = open.take() {
        done.push(param);
    }

    // Names the token walk never reached keep structural metadata only
    done.extend(remaining);

    Ok(Extraction {
        params: done,
        docstring,
    })
}

/// Map structural declarations onto parameter specs, validating the
/// annotation of each and the one-sequence-parameter rule.
fn build_specs(structure: &Structure, origin: &str) -> ExtractResult<Vec<ParamSpec>> {
    let mut specs = Vec::with_capacity(structure.decls.len());
    let mut sequence_seen = false;

    for decl in &structure.decls {
        let annotation = TypeExpr::parse(&decl.annotation).ok_or_else(|| {
            ExtractError::UnsupportedType {
                file: origin.to_string(),
                line: decl.line_no,
                source_line: decl.line.clone(),
                annotation: decl.annotation.clone(),
            }
        })?;

        if annotation.is_sequence() {
            if sequence_seen {
                return Err(ExtractError::MultipleSequenceParams(decl.name.clone()));
            }
            sequence_seen = true;
        }

        let mut spec = ParamSpec::new(&decl.name, annotation).with_line(&decl.line);
        if let Some(default) = &decl.default {
            spec = spec.with_default(default.clone());
        }
        specs.push(spec);
    }

    Ok(specs)
}

fn find_param(params: &[ParamSpec], name: &str) -> Option<usize> {
    params.iter().position(|p| p.name == name)
}

/// Whether the name just consumed sits in declaration position: the next
/// significant token is a colon. Keeps names inside type expressions and
/// default values from being mistaken for declarations.
pub(crate) fn at_declaration_position(tokens: &[Token], index: usize) -> bool {
    for token in &tokens[index..] {
        match token.kind {
            TokenKind::Comment | TokenKind::Newline => continue,
            TokenKind::Other => return token.text == ":",
            _ => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn extract_ok(source: &str) -> Extraction {
        extract(source, ANONYMOUS_ORIGIN).expect("extraction failed")
    }

    #[test]
    fn test_empty_signature() {
        let extraction = extract_ok("");
        assert!(extraction.params.is_empty());
    }

    #[test]
    fn test_comment_only_signature() {
        let extraction = extract_ok("# wut\n");
        assert!(extraction.params.is_empty());
    }

    #[test]
    fn test_inline_comment() {
        let extraction = extract_ok("bar: str  # input for bar\n");
        assert_eq!(extraction.params.len(), 1);
        assert_eq!(extraction.params[0].description, "input for bar");
        assert_eq!(extraction.params[0].default, None);
    }

    #[test]
    fn test_prepended_comment() {
        let extraction = extract_ok("# input for bar\nbar: str\n");
        assert_eq!(extraction.params.len(), 1);
        assert_eq!(extraction.params[0].description, "input for bar");
    }

    #[test]
    fn test_inline_comment_only_on_own_declaration() {
        let extraction = extract_ok("foo: int,  # stuff\nbar: int\n");
        assert_eq!(extraction.params.len(), 2);
        assert_eq!(extraction.params[0].description, "stuff");
        assert_eq!(extraction.params[1].description, "");
    }

    #[test]
    fn test_default_and_comment_oneline() {
        let extraction = extract_ok("foo_bar: int = 10,  # testfoo 123\n");
        let param = &extraction.params[0];
        assert_eq!(param.default, Some(Value::Int(10)));
        assert_eq!(param.description, "testfoo 123");
    }

    #[test]
    fn test_float_default() {
        let extraction = extract_ok("pi: float = 3.1415,  # It's Pi\n");
        let param = &extraction.params[0];
        assert_eq!(param.default, Some(Value::Float(3.1415)));
        assert_eq!(param.description, "It's Pi");
    }

    #[test]
    fn test_optional_derived() {
        let extraction = extract_ok("quux: Optional[str]\n");
        let param = &extraction.params[0];
        assert!(param.is_optional());
        assert!(!param.is_required());
        assert_eq!(param.default, None);
    }

    #[test]
    fn test_full_declaration_list() {
        let source = "\
\"\"\"
This function does things
\"\"\"
foo: int,
quux: Optional[str],
bar: str = \"testing\",  # Only change if necessary
";
        let extraction = extract_ok(source);
        assert_eq!(
            extraction.docstring.as_deref(),
            Some("\nThis function does things\n")
        );

        let params = &extraction.params;
        assert_eq!(params.len(), 3);

        assert_eq!(params[0].name, "foo");
        assert!(params[0].is_required());
        assert!(!params[0].is_optional());
        assert_eq!(params[0].description, "");

        assert_eq!(params[1].name, "quux");
        assert!(!params[1].is_required());
        assert!(params[1].is_optional());
        assert_eq!(params[1].description, "");

        assert_eq!(params[2].name, "bar");
        assert_eq!(params[2].default, Some(Value::Str("testing".to_string())));
        assert!(!params[2].is_required());
        assert_eq!(params[2].description, "Only change if necessary");
    }

    #[test]
    fn test_name_in_default_not_mistaken_for_declaration() {
        // `flag` defaults to True; True is a name but not a declaration
        let extraction = extract_ok("flag: bool = True,\ncount: int\n");
        let names: Vec<&str> = extraction.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["flag", "count"]);
    }

    #[test]
    fn test_name_echoed_in_string_default() {
        // The string default of `greeting` mentions `count`; the real
        // declaration of `count` must still win
        let extraction =
            extract_ok("greeting: str = \"count\",  # say this\ncount: int  # how many\n");
        assert_eq!(extraction.params.len(), 2);
        assert_eq!(extraction.params[0].description, "say this");
        assert_eq!(extraction.params[1].description, "how many");
    }

    #[test]
    fn test_comment_on_continuation_line() {
        let source = "quux: Optional[\n    str\n],  # might matter\n";
        let extraction = extract_ok(source);
        assert_eq!(extraction.params[0].description, "might matter");
    }

    #[test]
    fn test_trailing_comment_attaches_to_previous() {
        let source = "foo: int,\n# about foo, actually\nbar: str  # about bar\n";
        let extraction = extract_ok(source);
        assert_eq!(extraction.params[0].description, "about foo, actually");
        assert_eq!(extraction.params[1].description, "about bar");
    }

    #[test]
    fn test_unsupported_type_reports_line() {
        let err = extract("foo: int,\nbad: dict[str, int]\n", ANONYMOUS_ORIGIN).unwrap_err();
        match err {
            ExtractError::UnsupportedType {
                line, annotation, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(annotation, "dict[str,int]");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_annotation_is_fatal() {
        let err = extract("foo\n", ANONYMOUS_ORIGIN).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingTypeAnnotation { ref name, .. } if name == "foo"
        ));
    }

    #[test]
    fn test_second_sequence_param_rejected() {
        let err = extract("a: list[int],\nb: set[str]\n", ANONYMOUS_ORIGIN).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MultipleSequenceParams(ref name) if name == "b"
        ));
    }

    #[test]
    fn test_parenthesized_signature() {
        let source = "(\n    name: str,  # who to greet\n    count: int = 1\n)";
        let extraction = extract_ok(source);
        assert_eq!(extraction.params.len(), 2);
        assert_eq!(extraction.params[0].description, "who to greet");
        assert_eq!(extraction.params[1].default, Some(Value::Int(1)));
    }
}
