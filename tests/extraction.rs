//! Integration tests for signature extraction

use clisig::error::ExtractError;
use clisig::extract::{extract, ANONYMOUS_ORIGIN};
use clisig::{App, TypeExpr, Value};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_empty_signature() {
    let extraction = extract("", ANONYMOUS_ORIGIN).unwrap();
    assert!(extraction.params.is_empty());
}

#[test]
fn test_empty_with_comment() {
    let extraction = extract("# wut\n", ANONYMOUS_ORIGIN).unwrap();
    assert!(extraction.params.is_empty());
}

#[test]
fn test_integer_with_default_oneline() {
    let extraction = extract("foo: int = 123", ANONYMOUS_ORIGIN).unwrap();
    assert_eq!(extraction.params.len(), 1);
    let foo = &extraction.params[0];
    assert_eq!(foo.name, "foo");
    assert_eq!(foo.annotation, TypeExpr::Int);
    assert_eq!(foo.default, Some(Value::Int(123)));
    assert!(!foo.is_required());
}

#[test]
fn test_boolean_with_default() {
    let extraction = extract("(\n    foo: bool = True\n)", ANONYMOUS_ORIGIN).unwrap();
    let foo = &extraction.params[0];
    assert_eq!(foo.default, Some(Value::Bool(true)));
    assert!(!foo.is_required());
    assert!(!foo.is_optional());
}

#[test]
fn test_string_with_inline_comment() {
    let extraction = extract("bar: str  # input for bar\n", ANONYMOUS_ORIGIN).unwrap();
    let bar = &extraction.params[0];
    assert_eq!(bar.default, None);
    assert_eq!(bar.description, "input for bar");
}

#[test]
fn test_string_with_prepended_comment() {
    let extraction = extract("# input for bar\nbar: str\n", ANONYMOUS_ORIGIN).unwrap();
    let bar = &extraction.params[0];
    assert_eq!(bar.default, None);
    assert_eq!(bar.description, "input for bar");
}

#[test]
fn test_int_with_oneline_comment() {
    let extraction = extract("foo_bar: int = 10,  # testfoo 123\n", ANONYMOUS_ORIGIN).unwrap();
    let foo_bar = &extraction.params[0];
    assert_eq!(foo_bar.default, Some(Value::Int(10)));
    assert_eq!(foo_bar.description, "testfoo 123");
    assert_eq!(foo_bar.help_name(), "foo-bar");
}

#[test]
fn test_float_with_oneline_comment() {
    let extraction = extract("pi: float = 3.1415,  # It's Pi\n", ANONYMOUS_ORIGIN).unwrap();
    let pi = &extraction.params[0];
    assert_eq!(pi.default, Some(Value::Float(3.1415)));
    assert_eq!(pi.description, "It's Pi");
}

#[test]
fn test_optional_implies_not_required() {
    let extraction = extract("quux: Optional[str]\n", ANONYMOUS_ORIGIN).unwrap();
    let quux = &extraction.params[0];
    assert_eq!(quux.default, None);
    assert!(!quux.is_required());
    assert!(quux.is_optional());
}

#[test]
fn test_optional_with_comment() {
    let extraction =
        extract("quux: Optional[str]  # Might be important\n", ANONYMOUS_ORIGIN).unwrap();
    let quux = &extraction.params[0];
    assert!(quux.is_optional());
    assert_eq!(quux.description, "Might be important");
}

#[test]
fn test_complex_with_docstring() {
    let source = "\
\"\"\"
This function does things
\"\"\"
foo: int,
quux: Optional[str],
bar: str = \"testing\",  # Only change if necessary
";
    let extraction = extract(source, ANONYMOUS_ORIGIN).unwrap();
    let params = &extraction.params;
    assert_eq!(params.len(), 3);

    assert_eq!(params[0].name, "foo");
    assert_eq!(params[0].default, None);
    assert!(params[0].is_required());
    assert!(!params[0].is_optional());
    assert_eq!(params[0].description, "");

    assert_eq!(params[1].name, "quux");
    assert_eq!(params[1].default, None);
    assert!(!params[1].is_required());
    assert!(params[1].is_optional());
    assert_eq!(params[1].description, "");

    assert_eq!(params[2].name, "bar");
    assert_eq!(params[2].default, Some(Value::Str("testing".to_string())));
    assert!(!params[2].is_required());
    assert!(!params[2].is_optional());
    assert_eq!(params[2].description, "Only change if necessary");
}

#[test]
fn test_union_types() {
    let extraction = extract(
        "that_var: Union[str, int],  # that is the var\npicky: int | float\n",
        ANONYMOUS_ORIGIN,
    )
    .unwrap();
    assert_eq!(extraction.params[0].help_type(), "[str, int]");
    assert_eq!(extraction.params[0].description, "that is the var");
    assert_eq!(extraction.params[1].help_type(), "[int, float]");
}

#[test]
fn test_missing_annotation_reports_file_and_line() {
    let err = extract("ok: int,\nbroken\n", "my_tool.sig").unwrap_err();
    match err {
        ExtractError::MissingTypeAnnotation {
            file, line, name, ..
        } => {
            assert_eq!(file, "my_tool.sig");
            assert_eq!(line, 2);
            assert_eq!(name, "broken");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unsupported_type_reports_offending_line() {
    let err = extract("ok: int,\nnope: Widget\n", ANONYMOUS_ORIGIN).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("UnsupportedType: Widget"));
    assert!(message.contains("line 2"));
    assert!(message.contains("nope: Widget"));
}

#[test]
fn test_signature_file_errors_carry_path() {
    let temp_dir = TempDir::new().unwrap();
    let sig_path = temp_dir.path().join("tool.sig");
    fs::write(&sig_path, "count: int,\nbad: dict[str, int]\n").unwrap();

    let err = App::from_signature_file("tool", &sig_path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("tool.sig"));
    assert!(message.contains("line 2"));
    assert!(message.contains("UnsupportedType"));
}

#[test]
fn test_signature_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let sig_path = temp_dir.path().join("tool.sig");
    fs::write(&sig_path, "name: str,  # who\ncount: int = 2\n").unwrap();

    let app = App::from_signature_file("tool", &sig_path).unwrap();
    assert_eq!(app.params().len(), 2);
    assert_eq!(app.params()[0].description, "who");
    assert_eq!(app.params()[1].default, Some(Value::Int(2)));
}

#[test]
fn test_missing_signature_file() {
    let err = App::from_signature_file("tool", "does/not/exist.sig").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.sig"));
}
