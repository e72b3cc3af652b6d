#![no_std]
#![allow(clippy::unnecessary_lazy_evaluations)]
#![allow(clippy::single_component_path_imports)]

pub mod at_command;
pub mod channel;
pub mod dispatch;
mod error;
pub mod line;
pub mod modem;
pub mod pump;
pub mod read;
pub mod tokenizer;
mod util;

pub use util::*;

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("'log' and 'defmt' features are mutually exclusive");
#[cfg(not(any(feature = "log", feature = "defmt")))]
compile_error!("please enable a logging feature, e.g. 'log' or 'defmt'");
#[cfg(feature = "defmt")]
pub(crate) use defmt as log;
#[cfg(feature = "log")]
pub(crate) use log;

pub use channel::{CommandChannel, ResponseChannel};
pub use error::Error;
pub use line::{Line, OwnedLine};
pub use read::{Fill, ModemReadBuffer, ReadBuffer};

/// The longest line, terminator excluded, the default read buffer will frame.
pub const MAX_LINE_LEN: usize = 256;
