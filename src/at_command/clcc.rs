use heapless::Vec;

use super::{catalogue, AtParseErr, AtParseLine, AtRequest, AtResponse, Command, Number};
use crate::{line::Line, log, tokenizer};

/// Most calls a modem tracks at once.
pub const MAX_CALLS: usize = 7;

/// AT+CLCC
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListCalls;

impl AtRequest for ListCalls {
    type Response = CallList;
    fn encode(&self) -> Command {
        catalogue::LIST_CALLS.into()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallList {
    pub calls: Vec<CallInfo, MAX_CALLS>,
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallInfo {
    pub index: u8,
    pub direction: CallDirection,
    pub state: CallState,
    pub mode: CallMode,
    pub multiparty: bool,
    pub number: Option<Number>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallDirection {
    MobileOriginated,
    MobileTerminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallState {
    Active,
    Held,
    Dialing,
    Alerting,
    Incoming,
    Waiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallMode {
    Voice,
    Data,
    Fax,
    Unknown,
}

impl AtParseLine for CallInfo {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        // +CLCC: 1,0,0,0,0,"+15551234567",129
        let fields = line.strip_prefix("+CLCC:").ok_or("Missing '+CLCC:'")?;
        let field = |index| tokenizer::element(index, fields).ok_or("Missing field");

        let index = field(0)?.parse()?;

        let direction = match field(1)? {
            "0" => CallDirection::MobileOriginated,
            "1" => CallDirection::MobileTerminated,
            _ => return Err("Failed to parse direction".into()),
        };

        let state = match field(2)? {
            "0" => CallState::Active,
            "1" => CallState::Held,
            "2" => CallState::Dialing,
            "3" => CallState::Alerting,
            "4" => CallState::Incoming,
            "5" => CallState::Waiting,
            _ => return Err("Failed to parse call state".into()),
        };

        let mode = match field(3)? {
            "0" => CallMode::Voice,
            "1" => CallMode::Data,
            "2" => CallMode::Fax,
            _ => CallMode::Unknown,
        };

        let multiparty = field(4)? == "1";

        // withheld numbers are reported as an empty string, or not at all
        let number = field(5).ok().filter(|n| !n.is_empty()).map(Number::new);

        Ok(CallInfo {
            index,
            direction,
            state,
            mode,
            multiparty,
            number,
        })
    }
}

impl AtResponse for CallList {
    fn accept(&mut self, line: &Line<'_>) -> bool {
        if !line.starts_with("+CLCC:") {
            return false;
        }

        match line.as_str().map(CallInfo::from_line) {
            Some(Ok(call)) => {
                if self.calls.push(call).is_err() {
                    log::warn!("more than {} calls listed, ignoring the rest", MAX_CALLS);
                }
            }
            _ => log::warn!("failed to parse call list entry: {:?}", line.as_bytes()),
        }
        true
    }
}
