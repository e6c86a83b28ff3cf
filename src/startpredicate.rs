//! Support for quickly finding potential match locations.

use crate::insn::{Insn, Program};
use memchr::memmem;

/// A cheap test for where a match may begin.
#[derive(Debug, Clone)]
pub enum StartPredicate {
    /// A match may begin anywhere.
    Arbitrary,

    /// Every match begins with this ASCII byte.
    Byte(u8),

    /// Every match begins with the UTF-8 encoding of one non-ASCII code point.
    Sequence(memmem::Finder<'static>),
}

impl StartPredicate {
    /// \return the offset of the first position in `haystack` where a match
    /// may begin, or None if there is none.
    #[inline]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        match self {
            StartPredicate::Arbitrary => Some(0),
            StartPredicate::Byte(b) => memchr::memchr(*b, haystack),
            StartPredicate::Sequence(finder) => finder.find(haystack),
        }
    }
}

/// \return the code point every match must begin with, if there is one.
/// This requires that all entry threads are CodePoint instructions for the
/// same code point; a reachable Success means the empty string matches.
fn first_code_point(program: &Program) -> Option<char> {
    let mut result = None;
    let mut check = |pc: usize| match program.get(pc) {
        Some(Insn::CodePoint(c)) if result.map_or(true, |r| r == *c) => {
            result = Some(*c);
            true
        }
        _ => false,
    };
    let all_same = match program.get(0)? {
        Insn::Start => program.successors(0).all(&mut check),
        _ => check(0),
    };
    if all_same {
        result
    } else {
        None
    }
}

/// Compute the start predicate for a program.
pub fn predict(program: &Program) -> StartPredicate {
    let c = match first_code_point(program) {
        Some(c) => c,
        None => return StartPredicate::Arbitrary,
    };
    let mut buf = [0; 4];
    let bytes = c.encode_utf8(&mut buf).as_bytes();
    if let [b] = bytes {
        StartPredicate::Byte(*b)
    } else {
        StartPredicate::Sequence(memmem::Finder::new(bytes).into_owned())
    }
}
