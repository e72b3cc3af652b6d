use super::{catalogue, AtRequest, Command, GenericOk};

/// ATH
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HangUp;

impl AtRequest for HangUp {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        catalogue::HANG_UP.into()
    }
}
