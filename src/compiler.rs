//! Recursive descent compiler from tokens to basic instructions.

use crate::error::{Error, Result};
use crate::insn::{BasicInstruction, BasicProgram};
use crate::tokenizer::{Token, TokenKind};
use std::iter::Peekable;

const HIGH_SURROGATES: std::ops::Range<u32> = 0xD800..0xDC00;
const LOW_SURROGATES: std::ops::Range<u32> = 0xDC00..0xE000;

/// A compiled sub-expression.
type Expr = Vec<BasicInstruction>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Quantifier {
    Optional,
    ZeroOrMore,
    OneOrMore,
}

struct Compiler<I: Iterator<Item = Result<Token>>> {
    tokens: Peekable<I>,
}

impl<I: Iterator<Item = Result<Token>>> Compiler<I> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.tokens.next().transpose()
    }

    /// Compile a sequence of sub-expressions. If `open` is set, this is a
    /// group opened at that offset and must end with `)`; otherwise it must
    /// end with the input.
    fn compile_level(&mut self, open: Option<usize>) -> Result<Expr> {
        let mut level = Expr::new();
        // The last completed sub-expression; quantifiers apply to it.
        let mut last: Option<Expr> = None;
        loop {
            let token = match self.next_token()? {
                Some(token) => token,
                None => match open {
                    Some(offset) => return Err(Error::UnbalancedParenthesis { offset }),
                    None => break,
                },
            };
            let expr = match token.kind {
                TokenKind::CodePoint => match token.first_char() {
                    Some(c) => vec![BasicInstruction::CodePointMatch(c)],
                    None => continue,
                },
                TokenKind::UnicodeEscape => {
                    vec![BasicInstruction::CodePointMatch(self.escape(&token)?)]
                }
                TokenKind::OpenGroup => self.compile_level(Some(token.offset))?,
                TokenKind::CloseGroup => {
                    if open.is_none() {
                        return Err(Error::UnbalancedParenthesis {
                            offset: token.offset,
                        });
                    }
                    break;
                }
                TokenKind::Optional => {
                    last = Some(quantify_last(Quantifier::Optional, &token, last.take())?);
                    continue;
                }
                TokenKind::ZeroOrMore => {
                    last = Some(quantify_last(Quantifier::ZeroOrMore, &token, last.take())?);
                    continue;
                }
                TokenKind::OneOrMore => {
                    last = Some(quantify_last(Quantifier::OneOrMore, &token, last.take())?);
                    continue;
                }
            };
            level.extend(last.replace(expr).into_iter().flatten());
        }
        level.extend(last.into_iter().flatten());
        Ok(level)
    }

    /// Decode a `\uXXXX` token. A high surrogate must be immediately
    /// followed by a low surrogate escape; the pair denotes one code point.
    fn escape(&mut self, token: &Token) -> Result<char> {
        let undefined = |text: String| Error::UndefinedCodePoint {
            text,
            offset: token.offset,
        };
        let high = escape_value(token)?;
        if LOW_SURROGATES.contains(&high) {
            return Err(undefined(token.text.clone()));
        }
        if !HIGH_SURROGATES.contains(&high) {
            return char::from_u32(high).ok_or_else(|| undefined(token.text.clone()));
        }
        let low = match self.tokens.peek() {
            Some(Ok(next)) if next.kind == TokenKind::UnicodeEscape => escape_value(next)?,
            Some(Err(err)) => return Err(err.clone()),
            _ => return Err(undefined(token.text.clone())),
        };
        if !LOW_SURROGATES.contains(&low) {
            return Err(undefined(token.text.clone()));
        }
        let pair = match self.next_token()? {
            Some(next) => format!("{}{}", token.text, next.text),
            None => token.text.clone(),
        };
        let cp = 0x10000 + ((high - HIGH_SURROGATES.start) << 10) + (low - LOW_SURROGATES.start);
        char::from_u32(cp).ok_or_else(|| undefined(pair))
    }
}

/// \return the numeric value of a `\uXXXX` token.
fn escape_value(token: &Token) -> Result<u32> {
    let malformed = || Error::MalformedEscape {
        text: token.text.clone(),
        offset: token.offset,
    };
    let digits = token.text.strip_prefix("\\u").ok_or_else(malformed)?;
    u32::from_str_radix(digits, 16).map_err(|_| malformed())
}

/// Apply a quantifier token to the preceding sub-expression, which must not
/// be empty.
fn quantify_last(q: Quantifier, token: &Token, last: Option<Expr>) -> Result<Expr> {
    match last {
        Some(body) if !body.is_empty() => Ok(quantify(q, body)),
        _ => Err(Error::MissingOperand {
            quantifier: token.first_char().unwrap_or('?'),
            offset: token.offset,
        }),
    }
}

/// Wrap `body` (of length n) in a quantifier.
fn quantify(q: Quantifier, body: Expr) -> Expr {
    let n = body.len() as isize;
    let mut expr = Expr::with_capacity(body.len() + 2);
    match q {
        Quantifier::Optional => {
            expr.push(BasicInstruction::Fork(n + 1));
            expr.extend(body);
        }
        Quantifier::ZeroOrMore => {
            expr.push(BasicInstruction::Fork(n + 2));
            expr.extend(body);
            expr.push(BasicInstruction::Jump(-(n + 1)));
        }
        Quantifier::OneOrMore => {
            expr.extend(body);
            expr.push(BasicInstruction::Fork(-n));
        }
    }
    expr
}

/// Compile a token sequence into a basic program terminated by Success.
pub fn compile<T>(tokens: T) -> Result<BasicProgram>
where
    T: IntoIterator<Item = Result<Token>>,
{
    let mut compiler = Compiler {
        tokens: tokens.into_iter().peekable(),
    };
    let mut insns = compiler.compile_level(None)?;
    insns.push(BasicInstruction::Success);
    Ok(BasicProgram { insns })
}
