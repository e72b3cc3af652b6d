use core::cell::Cell;

use embassy_sync::{
    blocking_mutex::{self, raw::CriticalSectionRawMutex},
    channel::Channel,
    mutex::Mutex,
};

use super::CommandRunner;
use crate::{
    at_command::{unsolicited::Urc, Command},
    dispatch,
    line::{Line, OwnedLine},
    log,
    util::{Lagged, RingChannel},
};

pub type UrcChannel = RingChannel<CriticalSectionRawMutex, Urc, 8>;

/// Shared state between the [Modem](super::Modem) handle and the pumps.
///
/// Meant to be put in a `static`, see [ModemContext::new].
pub struct ModemContext {
    pub(crate) command_lock: Mutex<CriticalSectionRawMutex, ()>,
    pub(crate) commands: Channel<CriticalSectionRawMutex, Command, 4>,
    pub(crate) replies: Channel<CriticalSectionRawMutex, OwnedLine, 8>,
    pub(crate) urcs: UrcChannel,
    awaiting_reply: blocking_mutex::Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl ModemContext {
    pub const fn new() -> Self {
        ModemContext {
            command_lock: Mutex::new(()),
            commands: Channel::new(),
            replies: Channel::new(),
            urcs: UrcChannel::new(),
            awaiting_reply: blocking_mutex::Mutex::new(Cell::new(false)),
        }
    }

    pub fn commands(&self) -> CommandRunner<'_> {
        CommandRunner::create(self)
    }

    /// Wait for the next unsolicited message.
    ///
    /// Returns `Err(Lagged)` once if messages were dropped because nobody was listening.
    pub async fn next_urc(&self) -> Result<Urc, Lagged> {
        self.urcs.recv().await
    }

    /// Whether received lines belong to an outstanding command.
    pub(crate) fn awaiting_reply(&self) -> bool {
        self.awaiting_reply.lock(|awaiting| awaiting.get())
    }

    pub(crate) fn set_awaiting_reply(&self, awaiting: bool) {
        self.awaiting_reply.lock(|cell| cell.set(awaiting));
    }

    /// Hand lines that reached the reply queue outside of a reply to the URC channel.
    ///
    /// These are lines that arrived right behind a final result code, or after a command gave
    /// up waiting. Anything that is not an unsolicited message is stale and dropped.
    pub(crate) fn flush_replies(&self) {
        while let Ok(line) = self.replies.try_receive() {
            match dispatch::unsolicited(&Line::new(&line)) {
                Some(urc) => {
                    log::debug!("Got URC: {:?}", urc);
                    self.urcs.send(urc);
                }
                None => log::debug!("Dropping stale reply line: {:?}", line.as_slice()),
            }
        }
    }
}

impl Default for ModemContext {
    fn default() -> Self {
        Self::new()
    }
}
