//! Common test utilities

use clisig::{App, BoundArgs, Outcome};

/// Build an app named "filename" from signature source
pub fn app(source: &str) -> App {
    App::from_signature("filename", source).expect("signature should extract")
}

/// Evaluate an argument vector and expect a successful binding
pub fn bind_args(source: &str, argv: &[&str]) -> BoundArgs {
    match app(source).evaluate(argv).expect("binding should succeed") {
        Outcome::Invoke(args) => args,
        other => panic!("expected a binding, got {other:?}"),
    }
}

/// Evaluate an argument vector and expect a failure message
pub fn bind_err(source: &str, argv: &[&str]) -> String {
    app(source)
        .evaluate(argv)
        .expect_err("binding should fail")
        .to_string()
}
