//! Unanchored search.

use crate::api::{Range, Regex};
use crate::stream::CodePointStream;

/// A trait for finding the next match in a string.
pub trait MatchProducer: std::fmt::Debug {
    /// Search for a match beginning at or after `pos`.
    /// \return the range of the match, setting `next_start` to the position to
    /// start looking for the next match, or None on failure.
    fn next_match(&mut self, pos: usize, next_start: &mut Option<usize>) -> Option<Range>;
}

/// Runs an anchored match at each candidate position of a string.
#[derive(Debug)]
pub struct Searcher<'r, 't> {
    re: &'r Regex,
    text: &'t str,
}

impl<'r, 't> Searcher<'r, 't> {
    pub fn new(re: &'r Regex, text: &'t str) -> Self {
        Self { re, text }
    }

    /// \return the byte length of the code point at `pos`, or None at the end
    /// of the text.
    fn char_len_at(&self, pos: usize) -> Option<usize> {
        self.text[pos..].chars().next().map(char::len_utf8)
    }

    /// Run an anchored match at `pos`.
    /// \return the byte length of the matched text.
    fn match_at(&self, pos: usize) -> Option<usize> {
        // A &str always decodes, so an error here cannot occur.
        let m = self
            .re
            .match_stream(CodePointStream::from_text(&self.text[pos..]))
            .ok()?;
        m.matched_text().map(str::len)
    }
}

impl MatchProducer for Searcher<'_, '_> {
    fn next_match(&mut self, mut pos: usize, next_start: &mut Option<usize>) -> Option<Range> {
        let bytes = self.text.as_bytes();
        while pos <= bytes.len() && self.text.is_char_boundary(pos) {
            let candidate = pos + self.re.start_predicate().find(&bytes[pos..])?;
            if let Some(len) = self.match_at(candidate) {
                let end = candidate + len;
                *next_start = if len > 0 {
                    Some(end)
                } else {
                    // Step over one code point after an empty match.
                    self.char_len_at(end).map(|n| end + n)
                };
                return Some(candidate..end);
            }
            pos = candidate + self.char_len_at(candidate)?;
        }
        None
    }
}

/// A struct which enables iteration over matches.
#[derive(Debug)]
pub struct Matches<Producer: MatchProducer> {
    mp: Producer,
    offset: Option<usize>,
}

impl<Producer: MatchProducer> Matches<Producer> {
    pub fn new(mp: Producer, start: usize) -> Self {
        Matches {
            mp,
            offset: Some(start),
        }
    }
}

impl<Producer: MatchProducer> Iterator for Matches<Producer> {
    type Item = Range;
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset.take()?;
        self.mp.next_match(start, &mut self.offset)
    }
}
