use crate::at_command::{AtParseErr, AtParseLine};
use crate::tokenizer;

/// Network registration status
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkRegistration {
    pub status: RegistrationStatus,

    /// Location area code
    pub lac: Option<u16>,

    /// Cell ID
    pub ci: Option<u32>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    NotRegistered,
    RegisteredHome,
    Searching,
    RegistrationDenied,
    Unknown,
    RegisteredRoaming,
}

impl AtParseLine for NetworkRegistration {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        let rest = line.strip_prefix("+CREG: ").ok_or("Missing '+CREG: '")?;
        let len = 1 + rest.chars().filter(|&c| c == ',').count();

        // the reply to AT+CREG? leads with the <n> setting, the URC does not
        let first = match len {
            // <stat>[,<lac>,<ci>[,<AcT>]]
            1 | 3 | 4 => 0,
            // <n>,<stat>[,<lac>,<ci>[,<AcT>]]
            2 | 5 => 1,
            _ => return Err("Invalid number of elements".into()),
        };

        let status = tokenizer::element(first, rest)
            .ok_or("Missing <stat>")?
            .parse::<u8>()?;

        let status = match status {
            1 => RegistrationStatus::RegisteredHome,
            2 => RegistrationStatus::Searching,
            3 => RegistrationStatus::RegistrationDenied,
            4 => RegistrationStatus::Unknown,
            5 => RegistrationStatus::RegisteredRoaming,
            _ => RegistrationStatus::NotRegistered,
        };

        let lac = tokenizer::element(first + 1, rest).and_then(|f| u16::from_str_radix(f, 16).ok());
        let ci = tokenizer::element(first + 2, rest).and_then(|f| u32::from_str_radix(f, 16).ok());

        Ok(NetworkRegistration { status, lac, ci })
    }
}
