//! The signature tokenizer
//!
//! Lexes a source snippet (a single line or a whole signature block) into a
//! lazy stream of tokens. Lexical rules follow the annotation language:
//! identifiers, decimal and float numerals, single/double/triple-quoted
//! strings, `#` line comments, and bracket-aware newline classification.

use crate::error::{TokenizeError, TokenizeResult};
use crate::lexer::token::{Token, TokenKind};

/// Streaming tokenizer over signature source text
pub struct Tokenizer {
    chars: Vec<char>,
    lines: Vec<String>,
    pos: usize,
    line: usize,
    col: usize,
    depth: usize,
    finished: bool,
}

impl Tokenizer {
    /// Create a tokenizer over the given source snippet
    pub fn new(source: &str) -> Self {
        Tokenizer {
            chars: source.chars().collect(),
            lines: source.split('\n').map(str::to_string).collect(),
            pos: 0,
            line: 1,
            col: 0,
            depth: 0,
            finished: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn make_token(&self, kind: TokenKind, text: String, line_no: usize, col: usize) -> Token {
        Token {
            kind,
            text,
            line: self.lines.get(line_no - 1).cloned().unwrap_or_default(),
            line_no,
            col,
        }
    }

    fn scan_name(&mut self) -> Token {
        let (line_no, col) = (self.line, self.col);
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Name, text, line_no, col)
    }

    fn scan_number(&mut self) -> Token {
        let (line_no, col) = (self.line, self.col);
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') {
            text.push('.');
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() || ch == '_' {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..lookahead {
                    text.push(self.advance().unwrap_or_default());
                }
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_digit() {
                        text.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }
        self.make_token(TokenKind::Number, text, line_no, col)
    }

    fn scan_comment(&mut self) -> Token {
        let (line_no, col) = (self.line, self.col);
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
            self.advance();
        }
        self.make_token(TokenKind::Comment, text, line_no, col)
    }

    fn scan_string(&mut self, quote: char) -> TokenizeResult<Token> {
        let (line_no, col) = (self.line, self.col);
        let mut text = String::new();
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        let quote_len = if triple { 3 } else { 1 };
        for _ in 0..quote_len {
            text.push(self.advance().unwrap_or_default());
        }
        loop {
            match self.peek() {
                None => return Err(TokenizeError::UnterminatedString { line: line_no }),
                Some('\\') => {
                    text.push(self.advance().unwrap_or_default());
                    if let Some(escaped) = self.advance() {
                        text.push(escaped);
                    }
                }
                Some('\n') if !triple => {
                    return Err(TokenizeError::UnterminatedString { line: line_no });
                }
                Some(ch) if ch == quote => {
                    if !triple {
                        text.push(ch);
                        self.advance();
                        break;
                    }
                    if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                        for _ in 0..3 {
                            text.push(self.advance().unwrap_or_default());
                        }
                        break;
                    }
                    text.push(ch);
                    self.advance();
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
        Ok(self.make_token(TokenKind::Str, text, line_no, col))
    }
}

impl Iterator for Tokenizer {
    type Item = TokenizeResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // Skip horizontal whitespace
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }

        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                self.finished = true;
                if self.depth > 0 {
                    return Some(Err(TokenizeError::UnbalancedBracket { line: self.line }));
                }
                return None;
            }
        };

        let token = match ch {
            '\n' => {
                let (line_no, col) = (self.line, self.col);
                let kind = if self.depth > 0 {
                    TokenKind::Newline
                } else {
                    TokenKind::LogicalEnd
                };
                let token = self.make_token(kind, "\n".to_string(), line_no, col);
                self.advance();
                token
            }
            '#' => self.scan_comment(),
            '"' | '\'' => match self.scan_string(ch) {
                Ok(token) => token,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            },
            '\\' if self.peek_at(1) == Some('\n') => {
                // Explicit line continuation
                let (line_no, col) = (self.line, self.col);
                self.advance();
                self.advance();
                self.make_token(TokenKind::Newline, "\\\n".to_string(), line_no, col)
            }
            _ if ch.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            _ if ch.is_ascii_alphabetic() || ch == '_' => self.scan_name(),
            '(' | '[' | '{' => {
                let (line_no, col) = (self.line, self.col);
                self.depth += 1;
                self.advance();
                self.make_token(TokenKind::Other, ch.to_string(), line_no, col)
            }
            ')' | ']' | '}' => {
                let (line_no, col) = (self.line, self.col);
                if self.depth == 0 {
                    self.finished = true;
                    return Some(Err(TokenizeError::UnbalancedBracket { line: line_no }));
                }
                self.depth -= 1;
                self.advance();
                self.make_token(TokenKind::Other, ch.to_string(), line_no, col)
            }
            _ => {
                let (line_no, col) = (self.line, self.col);
                self.advance();
                self.make_token(TokenKind::Other, ch.to_string(), line_no, col)
            }
        };

        Some(Ok(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Tokenizer::new(source)
            .map(|t| t.expect("tokenize failed").kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        Tokenizer::new(source)
            .map(|t| t.expect("tokenize failed").text)
            .collect()
    }

    #[test]
    fn test_simple_declaration() {
        assert_eq!(
            texts("foo: int = 123,"),
            vec!["foo", ":", "int", "=", "123", ","]
        );
        assert_eq!(
            kinds("foo: int = 123,"),
            vec![
                TokenKind::Name,
                TokenKind::Other,
                TokenKind::Name,
                TokenKind::Other,
                TokenKind::Number,
                TokenKind::Other,
            ]
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let tokens: Vec<_> = Tokenizer::new("bar: str  # input for bar\n")
            .map(|t| t.unwrap())
            .collect();
        let comment = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Comment)
            .unwrap();
        assert_eq!(comment.text, "# input for bar");
        assert_eq!(comment.line, "bar: str  # input for bar");
    }

    #[test]
    fn test_newline_classification() {
        // Inside a bracket the line break continues the logical line
        let kinds = kinds("quux: Optional[\nstr]\n");
        assert!(kinds.contains(&TokenKind::Newline));
        assert_eq!(kinds.last(), Some(&TokenKind::LogicalEnd));
    }

    #[test]
    fn test_float_and_exponent() {
        assert_eq!(texts("3.1415"), vec!["3.1415"]);
        assert_eq!(texts("1e10"), vec!["1e10"]);
        assert_eq!(texts("2.5e-3"), vec!["2.5e-3"]);
        assert_eq!(kinds("3.1415"), vec![TokenKind::Number]);
    }

    #[test]
    fn test_string_kinds() {
        assert_eq!(kinds("\"testing\""), vec![TokenKind::Str]);
        assert_eq!(kinds("'testing'"), vec![TokenKind::Str]);
        assert_eq!(
            kinds("\"\"\"\nmulti\nline\n\"\"\""),
            vec![TokenKind::Str]
        );
    }

    #[test]
    fn test_unterminated_string_errors() {
        let result: Result<Vec<_>, _> = Tokenizer::new("foo = \"oops\n").collect();
        assert!(matches!(
            result,
            Err(TokenizeError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn test_unbalanced_bracket_errors() {
        let result: Result<Vec<_>, _> = Tokenizer::new("foo: list[int").collect();
        assert!(matches!(
            result,
            Err(TokenizeError::UnbalancedBracket { .. })
        ));

        let result: Result<Vec<_>, _> = Tokenizer::new("foo: int)").collect();
        assert!(matches!(
            result,
            Err(TokenizeError::UnbalancedBracket { line: 1 })
        ));
    }

    #[test]
    fn test_line_continuation() {
        let kinds = kinds("foo: int = \\\n42\n");
        assert!(kinds.contains(&TokenKind::Newline));
    }

    #[test]
    fn test_tokens_carry_positions() {
        let tokens: Vec<_> = Tokenizer::new("a: int,\nb: str\n")
            .map(|t| t.unwrap())
            .collect();
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!(b.line_no, 2);
        assert_eq!(b.col, 0);
        assert_eq!(b.line, "b: str");
    }
}
