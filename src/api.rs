use crate::compiler;
use crate::exec;
use crate::insn::{BasicProgram, Program};
use crate::linker;
use crate::pikevm::VirtualMachine;
use crate::startpredicate::{self, StartPredicate};
use crate::tokenizer;

use log::debug;
use std::{fmt, io, str::FromStr};

pub use crate::error::Error;
pub use crate::stream::CodePointStream;

/// Flags used to control compilation and execution diagnostics.
/// The default flags log nothing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// If set, log the compiler's output before linking.
    pub dump_basic: bool,

    /// If set, log the linked program.
    pub dump_program: bool,

    /// If set, log the number of live threads at every tick of a match.
    pub trace_ticks: bool,
}

impl Flags {
    /// Construct a Flags from an iterator of flag letters.
    /// 'b' dumps the basic program, 'p' dumps the linked program, 't' traces
    /// ticks. Other letters are ignored.
    #[inline]
    pub fn new<T: Iterator<Item = char>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            match c {
                'b' => {
                    result.dump_basic = true;
                }
                'p' => {
                    result.dump_program = true;
                }
                't' => {
                    result.trace_ticks = true;
                }
                _ => {
                    // Silently skip unsupported flags.
                }
            }
        }
        result
    }
}

impl From<&str> for Flags {
    /// Construct a Flags from a string of flag letters.
    ///
    /// See also: [`Flags::new`].
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.dump_basic {
            f.write_str("b")?;
        }
        if self.dump_program {
            f.write_str("p")?;
        }
        if self.trace_ticks {
            f.write_str("t")?;
        }
        Ok(())
    }
}

/// Range is used to express the extent of a search hit, as byte indexes into
/// the input string.
pub type Range = core::ops::Range<usize>;

/// An iterator type which yields the ranges of non-overlapping matches found
/// in a string.
pub type Matches<'r, 't> = exec::Matches<exec::Searcher<'r, 't>>;

/// Counters collected while running a match.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of ticks executed, including the priming tick.
    pub ticks: usize,

    /// The largest number of threads alive in one tick.
    pub peak_threads: usize,
}

/// The result of an anchored match.
///
/// A successful Match carries the matched text and the input following it.
/// An unsuccessful Match carries the whole input, unread.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    text: Option<String>,
    unread: CodePointStream<'a>,
    stats: Stats,
}

impl<'a> Match<'a> {
    pub(crate) fn found(text: String, unread: CodePointStream<'a>, stats: Stats) -> Self {
        Self {
            text: Some(text),
            unread,
            stats,
        }
    }

    pub(crate) fn not_found(input: CodePointStream<'a>, stats: Stats) -> Self {
        Self {
            text: None,
            unread: input,
            stats,
        }
    }

    /// \return whether the regex matched.
    #[inline]
    pub fn matched(&self) -> bool {
        self.text.is_some()
    }

    /// \return the matched text, or None if there was no match.
    /// Note this may be empty if the regex matched the empty string.
    #[inline]
    pub fn matched_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// \return the input following the match, or the whole input if there
    /// was no match.
    #[inline]
    pub fn unread(&self) -> &CodePointStream<'a> {
        &self.unread
    }

    #[inline]
    pub fn into_unread(self) -> CodePointStream<'a> {
        self.unread
    }

    #[inline]
    pub fn stats(&self) -> Stats {
        self.stats
    }
}

/// A Regex is the compiled version of a pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    basic: BasicProgram,
    program: Program,
    flags: Flags,
    start: StartPredicate,
}

impl Regex {
    /// Construct a regex by compiling `pattern` using the default flags.
    /// An Error may be returned if the syntax is invalid.
    #[inline]
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Construct a regex by compiling `pattern` with `flags`.
    /// An Error may be returned if the syntax is invalid.
    pub fn with_flags<F>(pattern: &str, flags: F) -> Result<Regex, Error>
    where
        F: Into<Flags>,
    {
        let flags = flags.into();
        let basic = compiler::compile(tokenizer::tokenize(pattern))?;
        if flags.dump_basic {
            debug!("Basic program for {:?}:\n{}", pattern, basic);
        }
        let program = linker::link(&basic);
        if flags.dump_program {
            debug!("Program for {:?}:\n{}", pattern, program);
        }
        let start = startpredicate::predict(&program);
        Ok(Regex {
            basic,
            program,
            flags,
            start,
        })
    }

    /// \return the linked program.
    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// \return the compiler's output, before linking.
    #[inline]
    pub fn basic_program(&self) -> &BasicProgram {
        &self.basic
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    pub(crate) fn start_predicate(&self) -> &StartPredicate {
        &self.start
    }

    /// Match against the start of `input`.
    /// An Error is returned if the input cannot be decoded.
    pub fn match_stream<'a>(&self, input: CodePointStream<'a>) -> Result<Match<'a>, Error> {
        VirtualMachine::new(&self.program)
            .trace_ticks(self.flags.trace_ticks)
            .run(input)
    }

    /// Match against the start of `text`.
    #[inline]
    pub fn match_str<'a>(&self, text: &'a str) -> Result<Match<'a>, Error> {
        self.match_stream(CodePointStream::from_text(text))
    }

    /// Match against the start of UTF-16 `units`.
    #[inline]
    pub fn match_utf16<'a>(&self, units: &'a [u16]) -> Result<Match<'a>, Error> {
        self.match_stream(CodePointStream::from_utf16(units))
    }

    /// Match against the start of big-endian UTF-16 read from `reader`.
    /// Only as much input as the match needs is read.
    #[inline]
    pub fn match_reader<'a, R: io::Read + 'a>(&self, reader: R) -> Result<Match<'a>, Error> {
        self.match_stream(CodePointStream::from_reader(reader))
    }

    /// Searches `text` to find the first match, at any position.
    #[inline]
    pub fn find(&self, text: &str) -> Option<Range> {
        self.find_iter(text).next()
    }

    /// Searches `text`, returning an iterator over non-overlapping matches.
    /// Note that the resulting Iterator borrows both the regex `'r` and the
    /// input string as `'t`.
    #[inline]
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        self.find_from(text, 0)
    }

    /// Returns an iterator for matches found in `text` starting at byte index
    /// `start`.
    #[inline]
    pub fn find_from<'r, 't>(&'r self, text: &'t str, start: usize) -> Matches<'r, 't> {
        exec::Matches::new(exec::Searcher::new(self, text), start)
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to compile a string into a regular expression
    #[inline]
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}

// The individual compilation phases, for tools that want to inspect them.
#[doc(hidden)]
pub mod backends {
    pub use crate::compiler::compile;
    pub use crate::insn::{BasicInstruction, BasicProgram, Insn, Program};
    pub use crate::linker::link;
    pub use crate::pikevm::VirtualMachine;
    pub use crate::stream::{CodeUnits, ReadUnits, SliceUnits, StrUnits};
    pub use crate::tokenizer::{tokenize, Token, TokenKind, Tokenizer};
}
