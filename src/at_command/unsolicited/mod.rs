//! Unsolicited Response Codes

use super::{AtParseErr, AtParseLine, SimStatus};

mod clip;
mod creg;
mod no_carrier;
mod power_down;
mod qind;
mod rdy;
mod ring;

pub use clip::CallerId;
pub use creg::{NetworkRegistration, RegistrationStatus};
pub use no_carrier::CallEnded;
pub use power_down::PoweredDown;
pub use qind::Indication;
pub use rdy::Ready;
pub use ring::Ring;

/// Unsolicited Response Code
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    Ring(Ring),
    CallerId(CallerId),
    CallEnded(CallEnded),
    SimStatus(SimStatus),
    NetworkRegistration(NetworkRegistration),
    Ready(Ready),
    PoweredDown(PoweredDown),
    Indication(Indication),
}

impl AtParseLine for Urc {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        /// Returns a function that tries to parse the line into a Urc::T
        fn parse<'a, T: AtParseLine>(
            line: &'a str,
            f: impl Fn(T) -> Urc + 'a,
        ) -> impl Fn(AtParseErr) -> Result<Urc, AtParseErr> + 'a {
            move |_| Ok(f(T::from_line(line)?))
        }

        Err(AtParseErr::default())
            .or_else(parse(line, Urc::Ring))
            .or_else(parse(line, Urc::CallerId))
            .or_else(parse(line, Urc::CallEnded))
            .or_else(parse(line, Urc::SimStatus))
            .or_else(parse(line, Urc::NetworkRegistration))
            .or_else(parse(line, Urc::Ready))
            .or_else(parse(line, Urc::PoweredDown))
            .or_else(parse(line, Urc::Indication))
            .map_err(|_| AtParseErr::from("Failed to parse as a URC"))
    }
}

impl Urc {
    /// Recognise an unsolicited line.
    pub fn parse(line: &str) -> Option<Urc> {
        Urc::from_line(line).ok()
    }
}
