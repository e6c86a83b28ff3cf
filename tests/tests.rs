// Work around dead code warnings: rust-lang issue #46379
pub mod common;

// Work around dead code warnings: rust-lang issue #46379
use common::*;

fn test_literals_tc(tc: TestConfig) {
    tc.compile("a").match1f("a").test_eq("a,");
    tc.compile("a").match1f("ab").test_eq("a,b");
    tc.compile("a").test_fails("b");
    tc.compile("a").test_fails("");
    tc.compile("abc").match1f("abcd").test_eq("abc,d");
    tc.compile("abc").test_fails("abx");
    tc.compile("").match1f("").test_eq(",");
    tc.compile("").match1f("xyz").test_eq(",xyz");
}

#[test]
fn test_literals() {
    test_with_configs(test_literals_tc)
}

fn test_star_tc(tc: TestConfig) {
    tc.compile("a*").match1f("").test_eq(",");
    tc.compile("a*").match1f("aaaa").test_eq("aaaa,");
    tc.compile("a*").match1f("aab").test_eq("aa,b");
    tc.compile("a*").match1f("b").test_eq(",b");
    tc.compile("ba*c").match1f("baaac").test_eq("baaac,");
    tc.compile("ba*c").match1f("bc").test_eq("bc,");
    tc.compile("ba*c").test_fails("baab");
}

#[test]
fn test_star() {
    test_with_configs(test_star_tc)
}

fn test_optional_tc(tc: TestConfig) {
    tc.compile("a?").match1f("").test_eq(",");
    tc.compile("a?").match1f("a").test_eq("a,");
    tc.compile("a?").match1f("aa").test_eq("a,a");
    tc.compile("ab?c").match1f("ac").test_eq("ac,");
    tc.compile("ab?c").match1f("abc").test_eq("abc,");
    tc.compile("ab?c").test_fails("abbc");
}

#[test]
fn test_optional() {
    test_with_configs(test_optional_tc)
}

fn test_plus_tc(tc: TestConfig) {
    tc.compile("a+").match1f("aaa").test_eq("aaa,");
    tc.compile("a+").test_fails("");
    tc.compile("a+").test_fails("b");
    tc.compile("(ab)+").match1f("ab").test_eq("ab,");
    tc.compile("(ab)+").match1f("abab").test_eq("abab,");
    tc.compile("(ab)+").match1f("ababa").test_eq("abab,a");
    tc.compile("(ab)+").test_fails("a");
    tc.compile("(ab)+").test_fails("");
}

#[test]
fn test_plus() {
    test_with_configs(test_plus_tc)
}

fn test_groups_tc(tc: TestConfig) {
    tc.compile("(a)").match1f("a").test_eq("a,");
    tc.compile("((a))b").match1f("ab").test_eq("ab,");
    tc.compile("x(ab)*y").match1f("xy").test_eq("xy,");
    tc.compile("x(ab)*y").match1f("xababy").test_eq("xababy,");
    tc.compile("x(ab)*y").test_fails("xabay");
    tc.compile("(a(bc)?)+").match1f("abcaabc!").test_eq("abcaabc,!");
    tc.compile("()a").match1f("a").test_eq("a,");
}

#[test]
fn test_groups() {
    test_with_configs(test_groups_tc)
}

fn test_priority_tc(tc: TestConfig) {
    // Greedy quantifiers prefer to consume.
    tc.compile("a*a").match1f("aaa").test_eq("aaa,");
    tc.compile("a?a").match1f("aa").test_eq("aa,");
    tc.compile("a?a").match1f("a").test_eq("a,");
    // A higher-priority thread still consuming outranks an earlier success.
    tc.compile("(ab)?a*").match1f("abaa").test_eq("abaa,");
    tc.compile("a*(ab)?").match1f("aab").test_eq("aa,b");
    // Nested loops over empty-matching bodies.
    tc.compile("(a*)*").match1f("aaab").test_eq("aaa,b");
    tc.compile("(a?)+b").match1f("aab").test_eq("aab,");
}

#[test]
fn test_priority() {
    test_with_configs(test_priority_tc)
}

fn test_escapes_tc(tc: TestConfig) {
    tc.compile("\\u0041").match1f("AB").test_eq("A,B");
    tc.compile("\\u00e9+").match1f("\u{e9}\u{e9}x").test_eq("\u{e9}\u{e9},x");
    tc.compile("\\u00E9").match1f("\u{e9}").test_eq("\u{e9},");
    // Backslash not followed by u is literal.
    tc.compile("\\a").match1f("\\a").test_eq("\\a,");
    tc.compile("a\\*").match1f("a\\\\").test_eq("a\\\\,");
    tc.compile("a\\*").match1f("a").test_eq("a,");
}

#[test]
fn test_escapes() {
    test_with_configs(test_escapes_tc)
}

fn test_supplementary_tc(tc: TestConfig) {
    let input = "\u{1F000}\u{1F000}z";
    for pattern in ["\u{1F000}+", "\\uD83C\\uDC00+", "(\\uD83C\\uDC00)+"] {
        let outcome = tc.compile(pattern).anchored(input);
        assert_eq!(outcome.matched.as_deref(), Some("\u{1F000}\u{1F000}"));
        assert_eq!(outcome.unread, "z");
    }
    let outcome = tc.compile("\u{1F000}").anchored("\u{1F000}");
    assert_eq!(outcome.matched.map(|s| s.chars().count()), Some(1));
    tc.compile("\\uD83C\\uDC01").test_fails("\u{1F000}");
}

#[test]
fn test_supplementary() {
    test_with_configs(test_supplementary_tc)
}

fn test_termination_tc(tc: TestConfig) {
    let inputs = ["", "a", "aaaa", "abab", "ababababx", "\u{1F000}a"];
    for pattern in ["a*", "(ab)+", "a?", "(a*)+", "(a?b?)*x", "\u{1F000}?a*"] {
        let cr = tc.compile(pattern);
        for input in inputs {
            let outcome = cr.anchored(input);
            let bound = input.chars().count() + 2;
            assert!(
                outcome.stats.ticks <= bound,
                "{} on {:?}: {} ticks",
                pattern,
                input,
                outcome.stats.ticks
            );
            assert!(outcome.stats.peak_threads <= cr.regex().program().len());
        }
    }
}

#[test]
fn test_termination() {
    test_with_configs(test_termination_tc)
}

#[test]
fn test_determinism() {
    for pattern in ["a*", "x(ab)*y?", "(a(bc)?)+", "\\uD83C\\uDC00*"] {
        let first = pikeregex::Regex::new(pattern).unwrap();
        for _ in 0..3 {
            let again = pikeregex::Regex::new(pattern).unwrap();
            assert_eq!(first.program(), again.program());
            assert_eq!(first.basic_program(), again.basic_program());
            assert_eq!(first.program().to_string(), again.program().to_string());
        }
        let m1 = first.match_str("xababyz").unwrap();
        let m2 = first.match_str("xababyz").unwrap();
        assert_eq!(m1.matched_text(), m2.matched_text());
        assert_eq!(m1.stats(), m2.stats());
    }
}

#[test]
fn test_no_match_returns_input() {
    let re = pikeregex::Regex::new("abc").unwrap();
    let input = pikeregex::CodePointStream::from_text("abx");
    let m = re.match_stream(input.clone()).unwrap();
    assert!(!m.matched());
    assert_eq!(m.matched_text(), None);
    assert!(m.unread().ptr_eq(&input));
}

#[test]
fn test_unread_is_shared() {
    // The unread stream is a node of the input stream, not a copy.
    let re = pikeregex::Regex::new("ab").unwrap();
    let input = pikeregex::CodePointStream::from_text("abcd");
    let m = re.match_stream(input.clone()).unwrap();
    let expected = input.tail().unwrap().tail().unwrap();
    assert!(m.unread().ptr_eq(&expected));
    assert_eq!(m.unread().code_unit_offset(), 2);
}

#[test]
fn test_listings() {
    let re = pikeregex::Regex::new("a*").unwrap();
    assert_eq!(
        re.basic_program().to_string(),
        "  0  FORK +3\n  1  CODEPOINT 'a'\n  2  JUMP -2\n  3  SUCCESS\n"
    );
    assert_eq!(
        re.program().to_string(),
        "  0  START -> (1, 2)\n  1  CODEPOINT 'a' -> (1, 2)\n  2  SUCCESS\n"
    );
}

#[test]
fn test_flags() {
    let flags = pikeregex::Flags::from("tbx");
    assert!(flags.dump_basic && flags.trace_ticks && !flags.dump_program);
    assert_eq!(flags.to_string(), "bt");
    assert_eq!(pikeregex::Flags::default().to_string(), "");
    let re = pikeregex::Regex::with_flags("a+", "bpt").unwrap();
    assert_eq!(re.flags().to_string(), "bpt");
    assert!(re.match_str("aa").unwrap().matched());
}

fn test_search_tc(tc: TestConfig) {
    tc.compile("ab").match_all("xxabyab").test_eq(vec!["ab", "ab"]);
    tc.compile("(ab)+").match_all("abababxab").test_eq(vec!["ababab", "ab"]);
    tc.compile("a*").match_all("baa").test_eq(vec!["", "aa", ""]);
    tc.compile("z").match_all("abc").test_eq(vec![]);
    tc.compile("\u{e9}+").match_all("caf\u{e9}\u{e9} \u{e9}").test_eq(vec!["\u{e9}\u{e9}", "\u{e9}"]);
    tc.compile("b?c").match_all("abcc").test_eq(vec!["bc", "c"]);
    assert_eq!(tc.compile("ab").match_all_from("abab", 1), vec![2..4]);
    assert!(tc.compile("x").match_all_from("x", 5).is_empty());
}

#[test]
fn test_search() {
    test_with_configs(test_search_tc)
}

#[test]
fn test_find() {
    let re = pikeregex::Regex::new("a+b").unwrap();
    assert_eq!(re.find("xxaab"), Some(2..5));
    assert_eq!(re.find("xxaa"), None);
    let re: pikeregex::Regex = "\u{1F000}".parse().unwrap();
    assert_eq!(re.find("ab\u{1F000}"), Some(2..6));
}
