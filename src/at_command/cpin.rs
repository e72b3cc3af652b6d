use super::{catalogue, AtParseErr, AtParseLine, AtRequest, AtResponse, Command, GenericOk};
use crate::line::Line;

/// AT+CPIN?
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetSimStatus;

/// AT+CPIN="<pin>"
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnterPin<'a>(pub &'a str);

/// What the SIM is waiting for, as reported by `+CPIN: <code>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimStatus {
    /// Not reported yet
    #[default]
    Unknown,

    /// No password is pending
    Ready,
    SimPin,
    SimPuk,
    SimPin2,
    SimPuk2,
    PhoneSimPin,
    NotInserted,
}

impl AtRequest for GetSimStatus {
    type Response = SimStatus;
    fn encode(&self) -> Command {
        catalogue::SIM_STATUS.into()
    }
}

impl AtRequest for EnterPin<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        Command::from_fmt(format_args!("{}\"{}\"", catalogue::ENTER_PIN, self.0))
    }
}

impl AtParseLine for SimStatus {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        let code = line.strip_prefix("+CPIN: ").ok_or("Missing '+CPIN: '")?;

        match code.trim() {
            "READY" => Ok(SimStatus::Ready),
            "SIM PIN" => Ok(SimStatus::SimPin),
            "SIM PUK" => Ok(SimStatus::SimPuk),
            "SIM PIN2" => Ok(SimStatus::SimPin2),
            "SIM PUK2" => Ok(SimStatus::SimPuk2),
            "PH-SIM PIN" => Ok(SimStatus::PhoneSimPin),
            "NOT INSERTED" | "NOT READY" => Ok(SimStatus::NotInserted),
            _ => Err("Unknown SIM status".into()),
        }
    }
}

impl AtResponse for SimStatus {
    fn accept(&mut self, line: &Line<'_>) -> bool {
        match line.as_str().map(SimStatus::from_line) {
            Some(Ok(status)) => {
                *self = status;
                true
            }
            _ => false,
        }
    }
}
