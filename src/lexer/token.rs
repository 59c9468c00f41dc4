//! Lexical token types for signature source text

use std::fmt;

/// The category of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier or keyword-like name (`foo`, `Optional`, `True`)
    Name,

    /// A decimal integer or float literal (`42`, `3.1415`)
    Number,

    /// A single-, double-, or triple-quoted string literal
    Str,

    /// A `#` comment running to the end of the physical line
    Comment,

    /// A physical line break that does not end the logical line
    /// (inside an open bracket, or after a `\` continuation)
    Newline,

    /// A physical line break that ends the logical line
    LogicalEnd,

    /// Any other punctuation or operator character
    Other,
}

/// A single lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The classified category of the token
    pub kind: TokenKind,

    /// The exact source text that produced this token
    pub text: String,

    /// The full physical line the token starts on, without its newline
    pub line: String,

    /// 1-based line number
    pub line_no: usize,

    /// 0-based column of the token's first character
    pub col: usize,
}

impl Token {
    /// The contents of a string literal token with quotes removed and
    /// simple backslash escapes resolved.
    ///
    /// Returns the raw text for non-string tokens.
    pub fn string_value(&self) -> String {
        if self.kind != TokenKind::Str {
            return self.text.clone();
        }
        let text = self.text.as_str();
        let body = strip_quotes(text, "\"\"\"")
            .or_else(|| strip_quotes(text, "'''"))
            .or_else(|| strip_quotes(text, "\""))
            .or_else(|| strip_quotes(text, "'"))
            .unwrap_or(text);
        unescape(body)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn strip_quotes<'a>(text: &'a str, quote: &str) -> Option<&'a str> {
    text.strip_prefix(quote)?.strip_suffix(quote)
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_token(text: &str) -> Token {
        Token {
            kind: TokenKind::Str,
            text: text.to_string(),
            line: text.to_string(),
            line_no: 1,
            col: 0,
        }
    }

    #[test]
    fn test_string_value_double_quoted() {
        assert_eq!(str_token("\"testing\"").string_value(), "testing");
    }

    #[test]
    fn test_string_value_triple_quoted() {
        assert_eq!(
            str_token("\"\"\"\nsome text\n\"\"\"").string_value(),
            "\nsome text\n"
        );
    }

    #[test]
    fn test_string_value_escapes() {
        assert_eq!(str_token("'a\\'b\\nc'").string_value(), "a'b\nc");
    }
}
