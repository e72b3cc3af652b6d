use super::{catalogue, AtRequest, Command, GenericOk, Number};

/// ATD<number>;
///
/// Start a voice call. `OK` only means the call setup started, the outcome is reported through
/// [super::ListCalls] and `NO CARRIER`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dial(pub Number);

impl AtRequest for Dial {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        Command::from_fmt(format_args!("{}{};", catalogue::DIAL, self.0))
    }
}
