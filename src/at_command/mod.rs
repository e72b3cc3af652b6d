use core::{
    fmt::{self, Debug},
    num::ParseIntError,
};

use heapless::String;

use crate::{line::Line, log, util::push_truncated};

pub mod catalogue;
pub mod generic_response;
pub mod unsolicited;

pub use generic_response::{FinalResult, GenericOk, ModemError};

pub mod at;
pub mod ata;
pub mod atd;
pub mod ate;
pub mod ath;
pub mod cfun;
pub mod clcc;
pub mod cpin;
pub mod creg;
pub mod qcfg;
pub mod qpowd;

pub use at::At;
pub use ata::Answer;
pub use atd::Dial;
pub use ate::SetEcho;
pub use ath::HangUp;
pub use cfun::Reboot;
pub use clcc::{CallDirection, CallInfo, CallList, CallMode, CallState, ListCalls};
pub use cpin::{EnterPin, GetSimStatus, SimStatus};
pub use creg::{GetRegistration, Registration};
pub use qcfg::{ConfigValue, QueryConfig, SetConfig};
pub use qpowd::PowerDown;

/// Capacity of a [Command], terminator included once rendered.
pub const COMMAND_LEN: usize = 256;

/// Capacity of a phone [Number].
pub const NUMBER_LEN: usize = 50;

#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct AtParseErr {
    #[allow(dead_code)]
    message: &'static str,
}

pub(crate) trait AtParseLine: Sized {
    fn from_line(line: &str) -> Result<Self, AtParseErr>;
}

#[cfg(feature = "defmt")]
pub trait AtRequest: Debug + defmt::Format {
    type Response: AtResponse;
    fn encode(&self) -> Command;
}

#[cfg(not(feature = "defmt"))]
pub trait AtRequest: Debug {
    type Response: AtResponse;
    fn encode(&self) -> Command;
}

/// The information lines a command replies with before its final result code.
pub trait AtResponse: Default {
    /// Fold an intermediate reply line into `self`.
    ///
    /// Returns `false` if the line does not belong to this kind of reply.
    fn accept(&mut self, line: &Line<'_>) -> bool;
}

/// The text of an AT command, without line terminator.
///
/// Text that does not fit in [COMMAND_LEN] bytes is truncated, with a warning.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(String<COMMAND_LEN>);

impl Command {
    pub fn new(text: &str) -> Self {
        let mut command = Command::default();
        command.push(text);
        command
    }

    /// Build a parameterised command, e.g. `Command::from_fmt(format_args!("ATD{};", number))`.
    pub fn from_fmt(args: fmt::Arguments<'_>) -> Self {
        let mut command = Command::default();
        // write_str never fails, it truncates
        let _ = fmt::Write::write_fmt(&mut command, args);
        command
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn push(&mut self, text: &str) {
        if !push_truncated(&mut self.0, text) {
            log::warn!("command truncated to {} bytes", COMMAND_LEN);
        }
    }
}

impl fmt::Write for Command {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s);
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Command::new(text)
    }
}

/// A phone number, at most [NUMBER_LEN] bytes.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Number(String<NUMBER_LEN>);

impl Number {
    pub fn new(number: &str) -> Self {
        let mut out = String::new();
        if !push_truncated(&mut out, number) {
            log::warn!("phone number truncated to {} bytes", NUMBER_LEN);
        }
        Number(out)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for AtParseErr {
    fn from(message: &'static str) -> Self {
        AtParseErr { message }
    }
}

impl From<ParseIntError> for AtParseErr {
    fn from(_: ParseIntError) -> Self {
        AtParseErr {
            message: "Failed to parse integer",
        }
    }
}
