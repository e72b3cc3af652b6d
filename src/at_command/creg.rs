use super::{
    catalogue, unsolicited::NetworkRegistration, AtParseLine, AtRequest, AtResponse, Command,
};
use crate::line::Line;

/// AT+CREG?
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetRegistration;

/// Reply to [GetRegistration].
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Registration(pub Option<NetworkRegistration>);

impl AtRequest for GetRegistration {
    type Response = Registration;
    fn encode(&self) -> Command {
        catalogue::REGISTRATION.into()
    }
}

impl AtResponse for Registration {
    fn accept(&mut self, line: &Line<'_>) -> bool {
        match line.as_str().map(NetworkRegistration::from_line) {
            Some(Ok(registration)) => {
                self.0 = Some(registration);
                true
            }
            _ => false,
        }
    }
}
