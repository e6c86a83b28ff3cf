#![allow(clippy::uninlined_format_args)]

/// Test that \p pattern fails to compile with default flags.
pub fn test_parse_fails(pattern: &str) {
    let res = pikeregex::Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have compiled: {}", pattern);
}

/// Encode a string as UTF16.
pub fn to_utf16(input: &str) -> Vec<u16> {
    input.encode_utf16().collect()
}

/// Encode a string as big-endian UTF16 bytes.
pub fn to_utf16be(input: &str) -> Vec<u8> {
    input.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// Format an anchored match as the matched text, a comma, and the unread
/// input.
fn format_match(matched: &str, unread: &str) -> String {
    format!("{},{}", matched, unread)
}

pub trait StringTestHelpers {
    /// "Fluent" style helper for testing that a String is equal to a str.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

pub trait VecTestHelpers {
    /// "Fluent" style helper for testing that a Vec<&str> is equal to a
    /// Vec<&str>.
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<&str> {
    fn test_eq(&self, rhs: Vec<&str>) {
        assert_eq!(*self, rhs)
    }
}

/// The outcome of an anchored match, detached from its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub matched: Option<String>,
    pub unread: String,
    pub stats: pikeregex::Stats,
}

/// A compiled regex which remembers a TestConfig.
#[derive(Debug, Clone)]
pub struct TestCompiledRegex {
    re: pikeregex::Regex,
    tc: TestConfig,
}

impl TestCompiledRegex {
    pub fn regex(&self) -> &pikeregex::Regex {
        &self.re
    }

    /// Match self against the start of \p input, using the configured
    /// encoding.
    #[track_caller]
    pub fn anchored(&self, input: &str) -> Outcome {
        fn detach(m: pikeregex::Match) -> Outcome {
            Outcome {
                matched: m.matched_text().map(str::to_string),
                unread: m.unread().remaining_text().expect("Unread input should decode"),
                stats: m.stats(),
            }
        }
        let res = match self.tc.encoding {
            Encoding::Str => self.re.match_str(input).map(detach),
            Encoding::Utf16 => self.re.match_utf16(&to_utf16(input)).map(detach),
            Encoding::Reader => {
                let bytes = to_utf16be(input);
                self.re.match_reader(bytes.as_slice()).map(detach)
            }
        };
        match res {
            Ok(outcome) => outcome,
            Err(err) => panic!("Match failed with {} for input {:?}", err, input),
        }
    }

    /// Match against a string, returning the formatted match.
    #[track_caller]
    pub fn match1f(&self, input: &str) -> String {
        let outcome = self.anchored(input);
        match outcome.matched {
            Some(text) => format_match(&text, &outcome.unread),
            None => panic!("Failed to match {}", input),
        }
    }

    /// Test that matching against \p input fails, leaving it unread.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        let outcome = self.anchored(input);
        assert!(outcome.matched.is_none(), "Should not have matched {}", input);
        assert_eq!(outcome.unread, input);
    }

    /// Test that matching against \p input succeeds.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(
            self.anchored(input).matched.is_some(),
            "Should have matched {}",
            input
        )
    }

    /// Return a list of all non-overlapping search hits.
    pub fn match_all<'b>(&self, input: &'b str) -> Vec<&'b str> {
        self.re.find_iter(input).map(move |r| &input[r]).collect()
    }

    /// Return a list of all non-overlapping search hit ranges from a given
    /// start.
    pub fn match_all_from(&self, input: &str, start: usize) -> Vec<pikeregex::Range> {
        self.re.find_from(input, start).collect()
    }
}

/// Our encoding types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Encoding {
    Str,
    Utf16,
    Reader,
}

/// Description of how to test a regex.
#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    // How input is handed to the regex.
    encoding: Encoding,
}

impl TestConfig {
    /// Compile a pattern to a regex, with default flags.
    pub fn compile(&self, pattern: &str) -> TestCompiledRegex {
        self.compilef(pattern, "")
    }

    /// Compile a pattern to a regex, with given flags.
    #[track_caller]
    pub fn compilef(&self, pattern: &str, flags_str: &str) -> TestCompiledRegex {
        let re = pikeregex::Regex::with_flags(pattern, flags_str);
        match re {
            Ok(re) => TestCompiledRegex { re, tc: *self },
            Err(err) => panic!(
                "Failed to compile! flags: {} pattern: {}, error: {}",
                flags_str, pattern, err
            ),
        }
    }

    /// Test that \p pattern compiles and matches \p input.
    #[track_caller]
    pub fn test_match_succeeds(&self, pattern: &str, input: &str) {
        self.compile(pattern).test_succeeds(input)
    }

    /// Test that \p pattern compiles and does not match \p input.
    #[track_caller]
    pub fn test_match_fails(&self, pattern: &str, input: &str) {
        self.compile(pattern).test_fails(input)
    }
}

/// Invoke \p F with each test config, in turn.
pub fn test_with_configs<F>(func: F)
where
    F: Fn(TestConfig),
{
    // Note we wish to be able to determine the TestConfig from the line number.
    func(TestConfig {
        encoding: Encoding::Str,
    });
    func(TestConfig {
        encoding: Encoding::Utf16,
    });
    func(TestConfig {
        encoding: Encoding::Reader,
    });
}
