//! Lazy code point streams decoded from UTF-16 code units.

use crate::error::{Error, Result};
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::io;
use std::rc::Rc;

const HIGH_SURROGATE_START: u16 = 0xD800;
const LOW_SURROGATE_START: u16 = 0xDC00;
const SURROGATE_END: u16 = 0xDFFF;

#[inline(always)]
fn is_high_surrogate(u: u16) -> bool {
    (HIGH_SURROGATE_START..LOW_SURROGATE_START).contains(&u)
}

#[inline(always)]
fn is_low_surrogate(u: u16) -> bool {
    (LOW_SURROGATE_START..=SURROGATE_END).contains(&u)
}

/// A source of UTF-16 code units.
pub trait CodeUnits {
    /// \return the next code unit, or None at end of input.
    fn next_unit(&mut self) -> Result<Option<u16>>;
}

/// Code units read from a slice.
#[derive(Debug, Clone)]
pub struct SliceUnits<'a> {
    units: &'a [u16],
    pos: usize,
}

impl<'a> SliceUnits<'a> {
    pub fn new(units: &'a [u16]) -> Self {
        Self { units, pos: 0 }
    }
}

impl CodeUnits for SliceUnits<'_> {
    #[inline]
    fn next_unit(&mut self) -> Result<Option<u16>> {
        let unit = self.units.get(self.pos).copied();
        if unit.is_some() {
            self.pos += 1;
        }
        Ok(unit)
    }
}

/// Code units produced by encoding a string on the fly.
#[derive(Clone)]
pub struct StrUnits<'a> {
    units: std::str::EncodeUtf16<'a>,
}

impl<'a> StrUnits<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            units: text.encode_utf16(),
        }
    }
}

impl CodeUnits for StrUnits<'_> {
    #[inline]
    fn next_unit(&mut self) -> Result<Option<u16>> {
        Ok(self.units.next())
    }
}

/// Code units read as big-endian byte pairs from a reader.
/// A trailing odd byte is a corrupt stream.
pub struct ReadUnits<R: io::Read> {
    bytes: io::Bytes<R>,
    offset: usize,
}

impl<R: io::Read> ReadUnits<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: reader.bytes(),
            offset: 0,
        }
    }
}

impl<R: io::Read> CodeUnits for ReadUnits<R> {
    fn next_unit(&mut self) -> Result<Option<u16>> {
        let high = match self.bytes.next().transpose()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let low = match self.bytes.next().transpose()? {
            Some(b) => b,
            None => {
                return Err(Error::CorruptStream {
                    offset: self.offset,
                })
            }
        };
        self.offset += 1;
        Ok(Some(u16::from_be_bytes([high, low])))
    }
}

/// Pulls code points out of a code unit source, tracking the code unit offset.
struct Decoder<'a> {
    units: Box<dyn CodeUnits + 'a>,
    offset: usize,
}

impl Decoder<'_> {
    fn next_unit(&mut self) -> Result<Option<u16>> {
        let unit = self.units.next_unit()?;
        if unit.is_some() {
            self.offset += 1;
        }
        Ok(unit)
    }

    /// Decode the next code point, or None at end of input.
    fn decode(&mut self) -> Result<Option<char>> {
        let start = self.offset;
        let corrupt = || Error::CorruptStream { offset: start };
        let first = match self.next_unit()? {
            Some(u) => u,
            None => return Ok(None),
        };
        if is_low_surrogate(first) {
            return Err(corrupt());
        }
        if !is_high_surrogate(first) {
            return char::from_u32(u32::from(first)).map(Some).ok_or_else(corrupt);
        }
        let second = match self.next_unit()? {
            Some(u) if is_low_surrogate(u) => u,
            _ => return Err(corrupt()),
        };
        let cp = 0x10000
            + ((u32::from(first - HIGH_SURROGATE_START)) << 10)
            + u32::from(second - LOW_SURROGATE_START);
        char::from_u32(cp).map(Some).ok_or_else(corrupt)
    }
}

struct Node<'a> {
    decoder: Rc<RefCell<Decoder<'a>>>,

    /// Code unit offset of this node's head in the source.
    offset: usize,

    /// The decoded head; None at end of input.
    head: OnceCell<Result<Option<char>>>,

    tail: OnceCell<CodePointStream<'a>>,
}

/// A lazy, memoized, singly-linked sequence of code points.
///
/// Each node decodes its head at most once and creates its tail at most once,
/// so a stream may be re-read through any number of handles. Cloning is
/// cheap: it clones the handle, not the node.
///
/// A node's head must be decoded before its tail is created; `tail()` enforces
/// this, which keeps the shared decoder reading in order.
#[derive(Clone)]
pub struct CodePointStream<'a>(Rc<Node<'a>>);

impl<'a> CodePointStream<'a> {
    /// Construct a stream over an arbitrary code unit source.
    pub fn from_units<U: CodeUnits + 'a>(units: U) -> Self {
        let decoder = Decoder {
            units: Box::new(units),
            offset: 0,
        };
        Self::new_node(Rc::new(RefCell::new(decoder)), 0)
    }

    /// Construct a stream over a string.
    pub fn from_text(text: &'a str) -> Self {
        Self::from_units(StrUnits::new(text))
    }

    /// Construct a stream over UTF-16 code units.
    pub fn from_utf16(units: &'a [u16]) -> Self {
        Self::from_units(SliceUnits::new(units))
    }

    /// Construct a stream over big-endian UTF-16 bytes.
    pub fn from_reader<R: io::Read + 'a>(reader: R) -> Self {
        Self::from_units(ReadUnits::new(reader))
    }

    fn new_node(decoder: Rc<RefCell<Decoder<'a>>>, offset: usize) -> Self {
        CodePointStream(Rc::new(Node {
            decoder,
            offset,
            head: OnceCell::new(),
            tail: OnceCell::new(),
        }))
    }

    /// \return the head code point, or None at end of input.
    pub fn peek(&self) -> Result<Option<char>> {
        let node = &self.0;
        node.head
            .get_or_init(|| node.decoder.borrow_mut().decode())
            .clone()
    }

    /// \return whether the stream is at end of input.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// \return the head code point. Fails at end of input.
    pub fn head(&self) -> Result<char> {
        self.peek()?.ok_or(Error::EmptyStream)
    }

    /// \return the stream advanced by one code point.
    /// At end of input this is the same stream.
    pub fn tail(&self) -> Result<CodePointStream<'a>> {
        if self.peek()?.is_none() {
            return Ok(self.clone());
        }
        let node = &self.0;
        let tail = node.tail.get_or_init(|| {
            let offset = node.decoder.borrow().offset;
            Self::new_node(Rc::clone(&node.decoder), offset)
        });
        Ok(tail.clone())
    }

    /// \return the code unit offset of this stream's head in the source.
    pub fn code_unit_offset(&self) -> usize {
        self.0.offset
    }

    /// \return whether two handles refer to the same stream node.
    pub fn ptr_eq(&self, other: &CodePointStream<'_>) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const u8,
            Rc::as_ptr(&other.0) as *const u8,
        )
    }

    /// \return an iterator over the remaining code points.
    pub fn iter(&self) -> Iter<'a> {
        Iter {
            stream: Some(self.clone()),
        }
    }

    /// Collect the remaining code points into a String.
    pub fn remaining_text(&self) -> Result<String> {
        self.iter().collect()
    }
}

impl fmt::Debug for CodePointStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CodePointStream")
            .field("offset", &self.0.offset)
            .field("head", &self.0.head.get())
            .finish()
    }
}

/// Iterator over the code points of a stream.
/// Yields at most one error, after which it is exhausted.
pub struct Iter<'a> {
    stream: Option<CodePointStream<'a>>,
}

impl Iterator for Iter<'_> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let stream = self.stream.take()?;
        let step = stream
            .peek()
            .and_then(|head| Ok((head, stream.tail()?)));
        match step {
            Ok((Some(c), tail)) => {
                self.stream = Some(tail);
                Some(Ok(c))
            }
            Ok((None, _)) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
