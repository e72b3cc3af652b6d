use core::{fmt, str::FromStr};

use heapless::{String, Vec};

use crate::{tokenizer, MAX_LINE_LEN};

/// An owned copy of a [Line], for keeping it past the line handler.
pub type OwnedLine = Vec<u8, MAX_LINE_LEN>;

/// One line received from the modem, without its terminator.
///
/// A `Line` borrows the read buffer and is only handed out for the duration of a
/// [crate::ReadBuffer::consume_lines] callback. Use [Line::to_owned_line] to keep it around.
pub struct Line<'a> {
    bytes: &'a [u8],
}

impl<'a> Line<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Line { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The line as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte-wise, case-sensitive prefix match.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.bytes.starts_with(prefix.as_bytes())
    }

    /// The rest of the line after `prefix`, if the line starts with it.
    pub fn value(&self, prefix: &str) -> Option<&'a str> {
        let rest = self.bytes.strip_prefix(prefix.as_bytes())?;
        core::str::from_utf8(rest).ok()
    }

    /// Call `f` with the rest of the line after `prefix`. Does nothing if the prefix is missing.
    ///
    /// ```
    /// # use quectel_at::Line;
    /// let line = Line::new(b"+CPIN: READY");
    /// assert_eq!(line.with_value("+CPIN: ", |status| status == "READY"), Some(true));
    /// assert_eq!(line.with_value("+CREG: ", |_| ()), None);
    /// ```
    pub fn with_value<R>(&self, prefix: &str, f: impl FnOnce(&str) -> R) -> Option<R> {
        self.value(prefix).map(f)
    }

    /// The number or quoted string at comma separated position `index`.
    ///
    /// See [tokenizer::element] for how positions are counted.
    pub fn element(&self, index: usize) -> Option<&'a str> {
        tokenizer::element(index, self.as_str()?)
    }

    /// Like [Line::element], copied into a bounded string. Empty if absent.
    pub fn comma_separated_element<const N: usize>(&self, index: usize) -> String<N> {
        self.as_str()
            .map(|s| tokenizer::comma_separated_element(index, s))
            .unwrap_or_default()
    }

    /// Parse the element at `index`.
    pub fn number<T: FromStr>(&self, index: usize) -> Option<T> {
        self.element(index)?.parse().ok()
    }

    /// Copy the line so it can outlive the read buffer. Truncated to [MAX_LINE_LEN] bytes.
    pub fn to_owned_line(&self) -> OwnedLine {
        let len = self.bytes.len().min(MAX_LINE_LEN);
        Vec::from_slice(&self.bytes[..len]).unwrap_or_default()
    }
}

impl PartialEq<str> for Line<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for Line<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes.escape_ascii())
    }
}

impl fmt::Debug for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.bytes.escape_ascii())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Line<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:a}", self.bytes)
    }
}
