/*!

# pikeregex - a small PikeVM regular expression engine

This crate compiles a minimal regular expression syntax to bytecode and runs it
with a Pike-style virtual machine over a lazily decoded UTF-16 code point
stream.

# Example: anchored matching

A match is anchored at the start of the input. It reports the matched text and
the input that was not consumed.

```rust
use pikeregex::Regex;
let re = Regex::new("a?").unwrap();
let m = re.match_str("aa").unwrap();
assert_eq!(m.matched_text(), Some("a"));
assert_eq!(m.unread().remaining_text().unwrap(), "a");
```

# Example: searching

```rust
use pikeregex::Regex;
let re = Regex::new("(ab)+").unwrap();
let text = "xxababyab";
let hits: Vec<&str> = re.find_iter(text).map(|r| &text[r]).collect();
assert_eq!(hits, vec!["abab", "ab"]);
```

# Supported Syntax

- Any code point matches itself. A `\` not followed by `u` is an ordinary code point.
- `\uXXXX` matches the code point with that hex value. A high surrogate escape
  followed by a low surrogate escape denotes one supplementary code point.
- `?`, `*` and `+` apply to the preceding code point or group. They are greedy.
- `(` and `)` group without capturing.

There is no alternation, no character classes and no capture groups.

# UTF-16 input

Input is decoded from UTF-16 code units: from a `&str`, a `&[u16]`, or big-endian
byte pairs read from any `std::io::Read`. Unpaired surrogates abort the match
with [`Error::CorruptStream`].

```rust
use pikeregex::{Error, Regex};
let re = Regex::new("\\uD83C\\uDC00").unwrap();
let units: Vec<u16> = "\u{1F000}".encode_utf16().collect();
assert!(re.match_utf16(&units).unwrap().matched());
assert!(matches!(re.match_utf16(&[0xDC00]), Err(Error::CorruptStream { .. })));
```

# Architecture

A tokenizer feeds a recursive descent compiler, which emits basic instructions
including Fork and Jump. The linker folds those away, so every instruction of
the final program either consumes a code point or succeeds. The virtual machine
advances all threads in lockstep, keeping at most one thread per instruction,
which bounds a match to one tick per input code point.

Diagnostics go through the `log` facade; see [`Flags`].

*/

#![warn(clippy::all)]

pub use crate::api::*;

mod api;
mod compiler;
mod error;
mod exec;
mod insn;
mod linker;
mod pikevm;
mod startpredicate;
mod stream;
mod tokenizer;
