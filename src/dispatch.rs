//! Matching received lines to the command that is waiting for them.
//!
//! The wire format carries no correlation between a command and its reply. A reply is simply
//! every line that arrives after the command was sent, up to a final result code such as `OK`
//! or `ERROR`. Unsolicited lines may show up at any point in between and are told apart by
//! their text alone.

use core::mem;

use crate::{
    at_command::{
        unsolicited::Urc, AtParseLine, AtRequest, AtResponse, Command, FinalResult, ModemError,
    },
    channel::CommandChannel,
    line::Line,
    log,
};

/// What a received line turned out to be.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event<R> {
    /// The modem echoing the command back.
    Echo,

    /// Part of the reply, folded into the response.
    Intermediate,

    /// The final result code arrived. Carries the accumulated response on `OK`.
    Complete(Result<R, ModemError>),

    Unsolicited(Urc),

    /// Empty, unreadable or unrecognised.
    Noise,
}

/// A command that was sent and is waiting for its reply.
pub struct Transaction<R> {
    command: Command,
    response: R,
    complete: bool,
}

impl<R: AtResponse> Transaction<R> {
    /// Send `request` and start collecting its reply.
    pub fn issue<Q>(request: &Q, channel: &mut impl CommandChannel) -> Self
    where
        Q: AtRequest<Response = R>,
    {
        let transaction = Transaction::start(request);
        channel.send(&transaction.command);
        transaction
    }

    /// Start collecting the reply to `request`, leaving it to the caller to send
    /// [Transaction::command].
    pub fn start<Q>(request: &Q) -> Self
    where
        Q: AtRequest<Response = R>,
    {
        log::trace!("Running AT command: {:?}", request);
        Transaction {
            command: request.encode(),
            response: R::default(),
            complete: false,
        }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Whether the final result code has been seen.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Classify a line received while this command is outstanding.
    ///
    /// In order of precedence a line is an echo of the command, a final result code, a line the
    /// response accepts, or an unsolicited line. Once complete, only unsolicited lines are
    /// recognised.
    pub fn handle(&mut self, line: &Line<'_>) -> Event<R> {
        let Some(text) = line.as_str() else {
            log::warn!("Got non UTF-8 line: {:?}", line.as_bytes());
            return Event::Noise;
        };

        if text.is_empty() {
            return Event::Noise;
        }

        if !self.complete {
            if line == &self.command.as_str() {
                return Event::Echo;
            }

            if let Ok(result) = FinalResult::from_line(text) {
                self.complete = true;
                let response = mem::take(&mut self.response);
                return Event::Complete(match result {
                    FinalResult::Ok => Ok(response),
                    FinalResult::Error(error) => Err(error),
                });
            }

            if self.response.accept(line) {
                return Event::Intermediate;
            }
        }

        match unsolicited(line) {
            Some(urc) => Event::Unsolicited(urc),
            None => Event::Noise,
        }
    }
}

/// Recognise a line received while no command is outstanding.
pub fn unsolicited(line: &Line<'_>) -> Option<Urc> {
    Urc::parse(line.as_str()?)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::{
        at_command::{
            unsolicited::CallEnded, Answer, CallState, GenericOk, GetSimStatus, HangUp, ListCalls,
            SimStatus,
        },
        read::{Fill, ModemReadBuffer},
    };

    #[derive(Default)]
    struct Recorder(Vec<Command>);

    impl CommandChannel for Recorder {
        fn send(&mut self, command: &Command) {
            self.0.push(command.clone());
        }
    }

    /// Frame `input` and run every line through `transaction`.
    fn feed<R: AtResponse>(transaction: &mut Transaction<R>, mut input: &[u8]) -> Vec<Event<R>> {
        let mut buffer = ModemReadBuffer::new();
        let mut events = Vec::new();
        while buffer.fill(&mut input) == Fill::Data {
            buffer.consume_lines(|line| events.push(transaction.handle(&line)));
        }
        events
    }

    #[test]
    fn sends_encoded_command() {
        let mut channel = Recorder::default();
        let transaction = Transaction::issue(&HangUp, &mut channel);

        assert_eq!(channel.0, [Command::new("ATH")]);
        assert_eq!(transaction.command().as_str(), "ATH");
        assert!(!transaction.is_complete());
    }

    #[test]
    fn multi_line_reply_with_echo_and_urc() {
        let mut channel = Recorder::default();
        let mut transaction = Transaction::issue(&ListCalls, &mut channel);

        let events = feed(
            &mut transaction,
            b"AT+CLCC\r\r\n\
              +CLCC: 1,0,0,0,0,\"+15551234567\",129\r\n\
              RING\r\n\
              +CLCC: 2,1,4,0,0,\"5550000\",129\r\n\
              \r\n\
              OK\r\n",
        );

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], Event::Echo);
        assert_eq!(events[1], Event::Intermediate);
        assert!(matches!(events[2], Event::Unsolicited(Urc::Ring(_))));
        assert_eq!(events[3], Event::Intermediate);

        let Event::Complete(Ok(list)) = &events[4] else {
            panic!("expected a complete call list, got {:?}", events[4]);
        };
        assert_eq!(list.calls.len(), 2);
        assert_eq!(list.calls[1].state, CallState::Incoming);
        assert!(transaction.is_complete());
    }

    #[test]
    fn error_result_completes() {
        let mut transaction = Transaction::issue(&Answer, &mut Recorder::default());
        let events = feed(&mut transaction, b"NO CARRIER\r\n");
        assert_eq!(events, [Event::Complete(Err(ModemError::NoCarrier))]);

        let mut transaction = Transaction::issue(&GetSimStatus, &mut Recorder::default());
        let events = feed(&mut transaction, b"+CME ERROR: 10\r\n");
        assert_eq!(
            events,
            [Event::Complete(Err(ModemError::CmeErr { code: 10 }))]
        );
    }

    #[test]
    fn reply_takes_precedence_over_urc() {
        let mut transaction = Transaction::issue(&GetSimStatus, &mut Recorder::default());
        let events = feed(&mut transaction, b"+CPIN: SIM PIN\r\nOK\r\n");

        assert_eq!(
            events,
            [
                Event::Intermediate,
                Event::Complete(Ok(SimStatus::SimPin))
            ]
        );
    }

    #[test]
    fn lines_after_completion() {
        let mut transaction: Transaction<GenericOk> =
            Transaction::issue(&HangUp, &mut Recorder::default());
        let events = feed(&mut transaction, b"OK\r\nOK\r\nNO CARRIER\r\n\xff\xfe\r\n");

        assert_eq!(
            events,
            [
                Event::Complete(Ok(GenericOk)),
                Event::Noise,
                Event::Unsolicited(Urc::CallEnded(CallEnded)),
                Event::Noise,
            ]
        );
    }

    #[test]
    fn idle_lines() {
        assert_eq!(
            unsolicited(&Line::new(b"NO CARRIER")),
            Some(Urc::CallEnded(CallEnded))
        );
        assert_eq!(unsolicited(&Line::new(b"OK")), None);
        assert_eq!(unsolicited(&Line::new(b"\xff")), None);
    }
}
