//! The two capabilities the protocol engine needs from a transport.

use heapless::String;

use crate::{
    at_command::{Command, COMMAND_LEN},
    log,
};

/// Something that can send commands to the modem.
pub trait CommandChannel {
    /// Transmit `command` followed by CR LF.
    fn send(&mut self, command: &Command);
}

/// Something that bytes received from the modem can be pulled from.
pub trait ResponseChannel {
    /// Copy available bytes into `buf`, returning how many were copied.
    ///
    /// Must not block. 0 means nothing is available right now, more may arrive later.
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

impl ResponseChannel for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        n
    }
}

impl<T: ResponseChannel + ?Sized> ResponseChannel for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }
}

/// Byte-level write half of a serial transport, e.g. a UART transmit FIFO.
pub trait SerialWrite {
    /// Write as much of `bytes` as can be accepted right now, returning how much that was.
    fn write(&mut self, bytes: &[u8]) -> usize;
}

/// Adapts a raw serial port to the channel traits.
///
/// Commands are rendered with their CR LF terminator into a [COMMAND_LEN] byte buffer before
/// being written. Truncation and short writes are logged, but otherwise ignored.
pub struct Serial<S>(pub S);

impl<S> Serial<S> {
    pub fn into_inner(self) -> S {
        self.0
    }
}

/// Render `command` with its CR LF terminator.
///
/// If the result would not fit in [COMMAND_LEN] bytes the command text is cut short so the
/// terminator still fits, and a warning is logged. Returns the rendered command and whether it
/// was truncated.
pub(crate) fn render(command: &Command) -> (String<COMMAND_LEN>, bool) {
    const CRLF: &str = "\r\n";

    let mut rendered = String::new();
    let mut truncated = false;
    for c in command.as_str().chars() {
        if rendered.len() + c.len_utf8() + CRLF.len() > COMMAND_LEN {
            truncated = true;
            break;
        }
        // checked above
        let _ = rendered.push(c);
    }
    let _ = rendered.push_str(CRLF);

    if truncated {
        log::warn!("command truncated to {} bytes", COMMAND_LEN);
    }

    (rendered, truncated)
}

impl<S: SerialWrite> CommandChannel for Serial<S> {
    fn send(&mut self, command: &Command) {
        let (rendered, _) = render(command);

        log::debug!("Write to modem: {:?}", rendered.as_str());
        let written = self.0.write(rendered.as_bytes());
        if written < rendered.len() {
            log::warn!(
                "transport accepted {} of {} command bytes",
                written,
                rendered.len()
            );
        }
    }
}

impl<S: ResponseChannel> ResponseChannel for Serial<S> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.0.read(buf)
    }
}
