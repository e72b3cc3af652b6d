use super::{catalogue, AtRequest, Command, GenericOk};

/// AT+QPOWD
///
/// The modem replies `OK` right away, and reports [super::unsolicited::Urc::PoweredDown] once
/// it is safe to cut power.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerDown;

impl AtRequest for PowerDown {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        catalogue::POWER_DOWN.into()
    }
}
