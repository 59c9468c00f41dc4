//! Signature tokenization
//!
//! This module lexes signature source text into the token stream consumed by
//! the extraction passes.

mod scan;
mod token;

pub use scan::Tokenizer;
pub use token::{Token, TokenKind};

/// Scan a single physical line for a trailing `#` comment.
///
/// Returns the comment text (including the `#`) if one was found, plus a flag
/// indicating whether the line tokenized cleanly. A line that fails to
/// tokenize after the comment was seen still reports the comment, but is not
/// considered cleanly scanned.
pub fn line_comment(line: &str) -> (Option<String>, bool) {
    let mut comment = None;
    for item in Tokenizer::new(line) {
        match item {
            Ok(token) => {
                if token.kind == TokenKind::Comment {
                    comment = Some(token.text);
                }
            }
            Err(_) => return (comment, false),
        }
    }
    (comment, true)
}
