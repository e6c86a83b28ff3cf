//! Lexical scanner for patterns.

use crate::error::{Error, Result};
use crate::stream::CodePointStream;

/// Number of hex digits following `\u`.
const ESCAPE_DIGITS: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Any code point without special meaning, including a lone `\`.
    CodePoint,
    /// `\u` followed by four hex digits.
    UnicodeEscape,
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `(`
    OpenGroup,
    /// `)`
    CloseGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,

    /// The pattern text this token was scanned from.
    pub text: String,

    /// Code point offset of the token in the pattern.
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// \return the first code point of the token's text.
    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }
}

/// A lazy iterator of tokens over a pattern.
/// After yielding an error it yields nothing further.
pub struct Tokenizer<'a> {
    input: CodePointStream<'a>,
    offset: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: CodePointStream<'a>) -> Self {
        Self {
            input,
            offset: 0,
            failed: false,
        }
    }

    /// Advance past the current code point.
    fn consume(&mut self) -> Result<()> {
        self.input = self.input.tail()?;
        self.offset += 1;
        Ok(())
    }

    /// Scan `\u` and its digits. The backslash has been consumed and the
    /// input is positioned at `u`.
    fn scan_escape(&mut self, start: usize) -> Result<Token> {
        let mut text = String::from("\\u");
        self.consume()?;
        for _ in 0..ESCAPE_DIGITS {
            match self.input.peek()? {
                Some(c) if c.is_ascii_hexdigit() => {
                    text.push(c);
                    self.consume()?;
                }
                Some(c) => {
                    text.push(c);
                    return Err(Error::MalformedEscape {
                        text,
                        offset: start,
                    });
                }
                None => {
                    return Err(Error::MalformedEscape {
                        text,
                        offset: start,
                    })
                }
            }
        }
        Ok(Token::new(TokenKind::UnicodeEscape, text, start))
    }

    fn scan(&mut self) -> Result<Option<Token>> {
        let c = match self.input.peek()? {
            Some(c) => c,
            None => return Ok(None),
        };
        let start = self.offset;
        self.consume()?;
        if c == '\\' && self.input.peek()? == Some('u') {
            return self.scan_escape(start).map(Some);
        }
        let kind = match c {
            '?' => TokenKind::Optional,
            '*' => TokenKind::ZeroOrMore,
            '+' => TokenKind::OneOrMore,
            '(' => TokenKind::OpenGroup,
            ')' => TokenKind::CloseGroup,
            _ => TokenKind::CodePoint,
        };
        Ok(Some(Token::new(kind, c, start)))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let res = self.scan().transpose();
        if matches!(res, Some(Err(_))) {
            self.failed = true;
        }
        res
    }
}

/// Tokenize a pattern string.
pub fn tokenize(pattern: &str) -> Tokenizer<'_> {
    Tokenizer::new(CodePointStream::from_text(pattern))
}
