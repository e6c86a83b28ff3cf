//! Errors produced while compiling a pattern or decoding input.

use std::io;
use thiserror::Error;

/// Represents an error encountered during regex compilation or matching.
///
/// Compile errors carry `offset`, the code point offset in the pattern where
/// the problem was detected. Decode errors carry the UTF-16 code unit offset
/// of the offending unit.
#[derive(Error, Debug)]
pub enum Error {
    /// A `(` was never closed, or a `)` was never opened.
    #[error("Unbalanced parenthesis at offset {offset}")]
    UnbalancedParenthesis { offset: usize },

    /// A quantifier has nothing (or only an empty group) to apply to.
    #[error("Quantifier '{quantifier}' at offset {offset} has no operand")]
    MissingOperand { quantifier: char, offset: usize },

    /// `\u` was not followed by exactly four hex digits.
    #[error("Malformed escape '{text}' at offset {offset}")]
    MalformedEscape { text: String, offset: usize },

    /// A well-formed escape does not name a Unicode scalar value.
    #[error("Escape '{text}' at offset {offset} is not a valid code point")]
    UndefinedCodePoint { text: String, offset: usize },

    /// The UTF-16 input contains an unpaired surrogate or a truncated unit.
    #[error("Corrupt stream at code unit {offset}")]
    CorruptStream { offset: usize },

    /// `head()` was called on a stream positioned at end of input.
    #[error("Empty stream")]
    EmptyStream,

    /// Reading code units from an external source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether this error was raised while compiling a pattern, as opposed to
    /// reading input.
    pub fn is_compile_error(&self) -> bool {
        match self {
            Error::UnbalancedParenthesis { .. }
            | Error::MissingOperand { .. }
            | Error::MalformedEscape { .. }
            | Error::UndefinedCodePoint { .. } => true,
            Error::CorruptStream { .. } | Error::EmptyStream | Error::Io(_) => false,
        }
    }
}

/// Stream nodes memoize their decode result, so a failure must be replayable
/// from every handle that observes it. `io::Error` is not `Clone`; rebuild it
/// from its kind and message.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::UnbalancedParenthesis { offset } => {
                Error::UnbalancedParenthesis { offset: *offset }
            }
            Error::MissingOperand { quantifier, offset } => Error::MissingOperand {
                quantifier: *quantifier,
                offset: *offset,
            },
            Error::MalformedEscape { text, offset } => Error::MalformedEscape {
                text: text.clone(),
                offset: *offset,
            },
            Error::UndefinedCodePoint { text, offset } => Error::UndefinedCodePoint {
                text: text.clone(),
                offset: *offset,
            },
            Error::CorruptStream { offset } => Error::CorruptStream { offset: *offset },
            Error::EmptyStream => Error::EmptyStream,
            Error::Io(err) => Error::Io(io::Error::new(err.kind(), err.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
