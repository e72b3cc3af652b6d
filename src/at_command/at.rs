use super::{catalogue, AtRequest, Command, GenericOk};

/// AT
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct At;

impl AtRequest for At {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        catalogue::AT.into()
    }
}
