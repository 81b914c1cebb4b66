//! # Legal Identifier Ordering
//!
//! Acts number their elements with identifiers like `"5"`, `"5/A"`, `"12"`,
//! `"1:28"` (book:article), `"1a"` (interleaved numeric point) or `"ba"`
//! (alphabetic subpoint). Lexicographic comparison gets these wrong
//! (`"12" < "2"`), so cut-point scans and range membership use this module's
//! ordering instead.
//!
//! An identifier is tokenized into maximal runs of digits and letters;
//! separators (`:`, `/`) only delimit tokens. Tokens compare element-wise:
//! digit runs numerically, letter runs lexicographically, and a digit run
//! sorts before a letter run. A shorter token list that is a prefix of a
//! longer one sorts first, which yields `"5" < "5/A" < "6"` and
//! `"1" < "1a" < "2"`.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Number(u64),
    Letters(&'a str),
}

fn tokenize(identifier: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = identifier.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let num = identifier[start..i].parse::<u64>().unwrap_or(u64::MAX);
            tokens.push(Token::Number(num));
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            tokens.push(Token::Letters(&identifier[start..i]));
        } else {
            // Separator (':', '/', whitespace) — token boundary only.
            i += 1;
        }
    }
    tokens
}

/// Compare two legal identifiers.
pub fn identifier_cmp(a: &str, b: &str) -> Ordering {
    let ta = tokenize(a);
    let tb = tokenize(b);
    for (x, y) in ta.iter().zip(tb.iter()) {
        let ord = match (x, y) {
            (Token::Number(n), Token::Number(m)) => n.cmp(m),
            (Token::Letters(s), Token::Letters(t)) => s.cmp(t),
            (Token::Number(_), Token::Letters(_)) => Ordering::Less,
            (Token::Letters(_), Token::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ta.len().cmp(&tb.len())
}

/// Returns true if `a` sorts strictly before `b`.
pub fn identifier_less(a: &str, b: &str) -> bool {
    identifier_cmp(a, b) == Ordering::Less
}
