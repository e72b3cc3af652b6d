use crate::{channel::ResponseChannel, line::Line, log, MAX_LINE_LEN};

/// Outcome of [ReadBuffer::fill].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fill {
    /// Bytes were appended. More may be pending, so fill again.
    Data,

    /// The channel had nothing to give right now.
    Done,
}

/// A read buffer able to frame lines of up to [MAX_LINE_LEN] bytes.
pub type ModemReadBuffer = ReadBuffer<{ 2 * MAX_LINE_LEN }>;

/// Accumulates raw modem bytes and splits them into lines.
///
/// A buffer frames lines of up to `CAPACITY / 2` bytes. The remaining half is head room for the
/// start of the next line, so a maximum-length line and some of its successor can always be
/// buffered before the overflow check kicks in.
///
/// Both CR and LF terminate a line, and any run of them is consumed as a single line end.
pub struct ReadBuffer<const CAPACITY: usize> {
    buffer: [u8; CAPACITY],
    payload_bytes: usize,
}

fn is_eol(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

impl<const CAPACITY: usize> ReadBuffer<CAPACITY> {
    /// Longest line, terminator excluded, that can wait in the buffer for its terminator.
    pub const MAX_LINE_LEN: usize = CAPACITY / 2;

    pub const fn new() -> Self {
        ReadBuffer {
            buffer: [0u8; CAPACITY],
            payload_bytes: 0,
        }
    }

    /// Pull whatever `channel` has available into the free tail of the buffer.
    ///
    /// Call this repeatedly, draining with [ReadBuffer::consume_lines] in between, until it
    /// returns [Fill::Done]. Filling a buffer that has no free space left is a usage error;
    /// it is logged and reported as [Fill::Done] without reading from the channel.
    pub fn fill(&mut self, channel: &mut impl ResponseChannel) -> Fill {
        let free = &mut self.buffer[self.payload_bytes..];
        if free.is_empty() {
            log::error!(
                "read buffer is full ({} bytes), consume lines before filling",
                CAPACITY
            );
            return Fill::Done;
        }

        let capacity = free.len();
        match channel.read(free) {
            0 => Fill::Done,
            copied => {
                self.payload_bytes += copied.min(capacity);
                Fill::Data
            }
        }
    }

    /// Hand every complete line in the buffer to `handler`, oldest first.
    ///
    /// A trailing partial line stays buffered until more data arrives. If the partial line is
    /// already longer than [Self::MAX_LINE_LEN], everything that is buffered is dropped.
    pub fn consume_lines(&mut self, mut handler: impl FnMut(Line<'_>)) {
        while self.consume_line(&mut handler).is_some() {}
    }

    /// Hand the oldest complete line to `handler` and return what it returned.
    ///
    /// Returns `None` if no complete line is buffered. See [ReadBuffer::consume_lines].
    pub fn consume_line<T>(&mut self, handler: impl FnOnce(Line<'_>) -> T) -> Option<T> {
        let payload = &self.buffer[..self.payload_bytes];

        let Some(line_len) = payload.iter().position(|&b| is_eol(b)) else {
            if self.payload_bytes > Self::MAX_LINE_LEN {
                log::error!(
                    "line exceeds {} bytes, discarding {} buffered bytes",
                    Self::MAX_LINE_LEN,
                    self.payload_bytes
                );
                self.payload_bytes = 0;
            }
            return None;
        };

        log::trace!("RECV LINE: {:?}", &payload[..line_len]);
        let result = handler(Line::new(&payload[..line_len]));

        let eol_chars = payload[line_len..]
            .iter()
            .take_while(|&&b| is_eol(b))
            .count();
        let consumed = line_len + eol_chars;

        self.buffer.copy_within(consumed..self.payload_bytes, 0);
        self.payload_bytes -= consumed;

        Some(result)
    }

    /// Bytes received but not yet consumed as a line.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.payload_bytes]
    }

    pub fn len(&self) -> usize {
        self.payload_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.payload_bytes == 0
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Drop all buffered bytes, e.g. after the transport was reopened.
    pub fn clear(&mut self) {
        self.payload_bytes = 0;
    }
}

impl<const CAPACITY: usize> Default for ReadBuffer<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::{string::String, vec, vec::Vec};

    use super::*;

    /// Hands out at most `chunk` bytes per read.
    struct Chunked<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl ResponseChannel for Chunked<'_> {
        fn read(&mut self, buf: &mut [u8]) -> usize {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            n
        }
    }

    fn collect<const C: usize>(buffer: &mut ReadBuffer<C>, lines: &mut Vec<String>) {
        buffer.consume_lines(|line| lines.push(String::from(line.as_str().expect("utf-8"))));
    }

    /// Run the fill/consume cycle until the channel runs dry.
    fn pump<const C: usize>(buffer: &mut ReadBuffer<C>, channel: &mut impl ResponseChannel) -> Vec<String> {
        let mut lines = Vec::new();
        while buffer.fill(channel) == Fill::Data {
            collect(buffer, &mut lines);
        }
        lines
    }

    #[test]
    fn drains_complete_lines_and_keeps_partial() {
        let mut buffer = ModemReadBuffer::new();
        let mut input: &[u8] = b"+CREG: 1\r\nRING\r\nOK\r\n+CLI";

        assert_eq!(buffer.fill(&mut input), Fill::Data);
        assert_eq!(buffer.fill(&mut input), Fill::Done);

        let mut lines = Vec::new();
        collect(&mut buffer, &mut lines);

        assert_eq!(lines, vec!["+CREG: 1", "RING", "OK"]);
        assert_eq!(buffer.pending(), b"+CLI");
        assert_eq!(buffer.len(), 4);

        // nothing new, nothing emitted
        collect(&mut buffer, &mut lines);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn preserves_order_for_any_chunking() {
        let stream = b"ATE0\r\nOK\r\n+CLCC: 1,0,0,0,0,\"+15551234567\",129\r\nOK\r\n";
        for chunk in 1..=stream.len() {
            let mut buffer = ModemReadBuffer::new();
            let mut channel = Chunked { data: stream, chunk };
            let mut lines = pump(&mut buffer, &mut channel);

            // a CR LF split between two drains leaves an empty line behind
            lines.retain(|line| !line.is_empty());

            assert_eq!(
                lines,
                vec![
                    "ATE0",
                    "OK",
                    "+CLCC: 1,0,0,0,0,\"+15551234567\",129",
                    "OK"
                ],
                "chunk size {chunk}"
            );
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn draining_after_every_byte_splits_terminators() {
        let mut buffer = ModemReadBuffer::new();
        let mut channel = Chunked {
            data: b"OK\r\nRING\n",
            chunk: 1,
        };

        let lines = pump(&mut buffer, &mut channel);
        assert_eq!(lines, vec!["OK", "", "RING"]);
    }

    #[test]
    fn one_line_at_a_time() {
        let mut buffer = ModemReadBuffer::new();
        assert_eq!(buffer.fill(&mut &b"AT\r\nOK\r\n+CL"[..]), Fill::Data);

        assert_eq!(buffer.consume_line(|line| line.len()), Some(2));
        assert_eq!(buffer.pending(), b"OK\r\n+CL");
        assert_eq!(buffer.consume_line(|line| line == "OK"), Some(true));
        assert_eq!(buffer.consume_line(|_| ()), None);
        assert_eq!(buffer.pending(), b"+CL");
    }

    #[test]
    fn accepts_any_terminator_run() {
        let inputs: [&[u8]; 4] = [b"OK\r\n", b"OK\n", b"OK\r", b"OK\r\n\r\n"];
        for input in inputs {
            let mut buffer = ModemReadBuffer::new();
            let lines = pump(&mut buffer, &mut &input[..]);
            assert_eq!(lines, vec!["OK"], "input {input:?}");
            assert!(buffer.is_empty());
        }

        let mut buffer = ModemReadBuffer::new();
        let lines = pump(&mut buffer, &mut &b"OK\r\n\n\rRING\n"[..]);
        assert_eq!(lines, vec!["OK", "RING"]);
    }

    #[test]
    fn overflow_discards_buffer_and_recovers() {
        let mut buffer = ReadBuffer::<16>::new();
        let mut calls = 0;

        let mut input: &[u8] = b"xxxxxxxxxxxx";
        assert_eq!(buffer.fill(&mut input), Fill::Data);
        buffer.consume_lines(|_| calls += 1);

        assert_eq!(calls, 0);
        assert!(buffer.is_empty());

        let lines = pump(&mut buffer, &mut &b"OK\r\n"[..]);
        assert_eq!(lines, vec!["OK"]);
    }

    #[test]
    fn partial_line_at_limit_is_kept() {
        let mut buffer = ReadBuffer::<16>::new();
        let lines = pump(&mut buffer, &mut &b"12345678"[..]);

        assert!(lines.is_empty());
        assert_eq!(buffer.pending(), b"12345678");

        let lines = pump(&mut buffer, &mut &b"\r\n"[..]);
        assert_eq!(lines, vec!["12345678"]);
    }

    #[test]
    fn fill_on_full_buffer_reports_done() {
        let mut buffer = ReadBuffer::<8>::new();
        let mut input: &[u8] = b"0123456789";

        assert_eq!(buffer.fill(&mut input), Fill::Data);
        assert_eq!(buffer.fill(&mut input), Fill::Done);
        assert_eq!(input, b"89");
        assert_eq!(buffer.len(), buffer.capacity());
    }

    #[test]
    fn compaction_never_loses_bytes() {
        let stream = b"0123456\r\n89\r\nabcdef\r\nghijklm\n";
        let mut buffer = ReadBuffer::<16>::new();
        let mut channel = Chunked {
            data: stream,
            chunk: 16,
        };

        let mut lines = Vec::new();
        loop {
            // fill all the way to capacity before draining
            let mut filled = false;
            while buffer.len() < buffer.capacity() && buffer.fill(&mut channel) == Fill::Data {
                filled = true;
            }
            collect(&mut buffer, &mut lines);
            if !filled {
                break;
            }
        }

        assert_eq!(lines, vec!["0123456", "89", "abcdef", "ghijklm"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn echo_and_reply_across_two_chunks() {
        let mut buffer = ModemReadBuffer::new();
        let mut first: &[u8] = b"AT\r\r";
        let mut second: &[u8] = b"\nOK\r\n";

        // both chunks arrive before the buffer is drained
        assert_eq!(buffer.fill(&mut first), Fill::Data);
        assert_eq!(buffer.fill(&mut second), Fill::Data);
        assert_eq!(buffer.fill(&mut second), Fill::Done);

        let mut lines = Vec::new();
        collect(&mut buffer, &mut lines);

        assert_eq!(lines, vec!["AT", "OK"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn terminator_split_across_drains_yields_empty_line() {
        let mut buffer = ModemReadBuffer::new();

        let mut lines = pump(&mut buffer, &mut &b"AT\r\r"[..]);
        lines.extend(pump(&mut buffer, &mut &b"\nOK\r\n"[..]));

        assert_eq!(lines, vec!["AT", "", "OK"]);
        assert!(buffer.is_empty());
    }
}
