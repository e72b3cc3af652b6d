//! Scanning of comma separated AT response fields.
//!
//! Responses look like `+CLCC: 1,0,0,0,0,"+15551234567",129`: an optional prefix followed by
//! comma separated numbers and double-quoted strings.

use heapless::String;

/// A lexical token of a response line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token<'a> {
    /// An optionally signed decimal number, e.g. `129` or `-3.5`.
    Number(&'a str),

    /// The contents of a double-quoted string, quotes stripped.
    String(&'a str),

    Comma,

    /// Any other run of text, e.g. a `+CLCC:` prefix or an unquoted enum value.
    Word(&'a str),
}

/// Splits a line into [Token]s, skipping whitespace between them.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(s: &'a str) -> Self {
        Tokenizer { rest: s }
    }
}

fn is_number(word: &str) -> bool {
    let digits = word.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(word);
    let (int, frac) = digits.split_once('.').unwrap_or((digits, "0"));
    !int.is_empty()
        && !frac.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let s = self.rest.trim_start();
        let first = s.chars().next()?;

        let token = match first {
            ',' => {
                self.rest = &s[1..];
                Token::Comma
            }
            '"' => {
                let quoted = &s[1..];
                // an unterminated string runs to the end of the line
                let end = quoted.find('"').unwrap_or(quoted.len());
                self.rest = quoted.get(end + 1..).unwrap_or("");
                Token::String(&quoted[..end])
            }
            _ => {
                let end = s
                    .find(|c: char| c == ',' || c == '"' || c.is_whitespace())
                    .unwrap_or(s.len());
                let (word, rest) = s.split_at(end);
                self.rest = rest;
                if is_number(word) {
                    Token::Number(word)
                } else {
                    Token::Word(word)
                }
            }
        };

        Some(token)
    }
}

/// The number or quoted string at comma separated position `index` of `s`.
///
/// Positions count the commas seen since the start of `s`. Words are skipped, so a response
/// prefix before the first comma does not take up a position of its own:
///
/// ```
/// # use quectel_at::tokenizer::element;
/// let line = r#"+CLCC: 1,0,0,0,0,"+15551234567",129"#;
/// assert_eq!(element(0, line), Some("1"));
/// assert_eq!(element(5, line), Some("+15551234567"));
/// assert_eq!(element(7, line), None);
/// ```
///
/// Quoted content comes back verbatim, so a leading `+` in a phone number is kept. A signed or
/// fractional value such as `-1` or `-3.5` is a single number and is returned whole:
///
/// ```
/// # use quectel_at::tokenizer::element;
/// assert_eq!(element(1, "+QCFG: 0,-1,-3.5"), Some("-1"));
/// assert_eq!(element(2, "+QCFG: 0,-1,-3.5"), Some("-3.5"));
/// ```
///
/// Returns `None` if there is no such position, or if it holds neither a number nor a string.
/// An empty field is indistinguishable from a missing one.
pub fn element(index: usize, s: &str) -> Option<&str> {
    let mut commas = 0;
    for token in Tokenizer::new(s) {
        match token {
            Token::Comma => {
                commas += 1;
                if commas > index {
                    return None;
                }
            }
            Token::Number(value) | Token::String(value) if commas == index => return Some(value),
            _ => {}
        }
    }
    None
}

/// Like [element], copied into a bounded string. Empty if absent, truncated to `N` bytes.
pub fn comma_separated_element<const N: usize>(index: usize, s: &str) -> String<N> {
    let mut out = String::new();
    if let Some(value) = element(index, s) {
        for c in value.chars() {
            if out.push(c).is_err() {
                break;
            }
        }
    }
    out
}
