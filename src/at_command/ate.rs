use super::{catalogue, AtRequest, Command, GenericOk};

/// ATE1 / ATE0
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetEcho(pub bool);

impl AtRequest for SetEcho {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        if self.0 {
            catalogue::ECHO_ON
        } else {
            catalogue::ECHO_OFF
        }
        .into()
    }
}
