use super::{catalogue, AtRequest, Command, GenericOk};

/// AT+CFUN=1,1
///
/// The modem resets after replying, expect an [super::unsolicited::Urc::Ready] once it is back.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reboot;

impl AtRequest for Reboot {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        catalogue::REBOOT.into()
    }
}
