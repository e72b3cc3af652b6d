use super::{catalogue, AtRequest, Command, GenericOk};

/// ATA
///
/// Fails with [super::ModemError::NoCarrier] if there is no call to answer.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Answer;

impl AtRequest for Answer {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        catalogue::ANSWER.into()
    }
}
