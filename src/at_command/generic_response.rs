use super::{AtParseErr, AtParseLine, AtResponse};
use crate::{line::Line, log};

/// Reply of commands that answer with nothing but a final result code.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenericOk;

impl AtResponse for GenericOk {
    fn accept(&mut self, _line: &Line<'_>) -> bool {
        false
    }
}

/// A final result code, ending the reply to a command.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FinalResult {
    Ok,
    Error(ModemError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemError {
    /// Generic error
    Generic,

    /// Error relating to mobile equipment or to the network.
    CmeErr { code: u32 },

    /// Error relating to message service or to the network.
    CmsErr { code: u32 },

    /// The connection was terminated, or could not be established.
    NoCarrier,

    /// The remote end is busy.
    Busy,

    /// The remote end did not answer in time.
    NoAnswer,

    NoDialtone,
}

impl AtParseLine for FinalResult {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        if line == "OK" {
            Ok(FinalResult::Ok)
        } else {
            ModemError::from_line(line).map(FinalResult::Error)
        }
    }
}

/// Parse the code of an extended error. Verbose (`AT+CMEE=2`) errors have no code.
fn error_code(code: &str) -> Option<u32> {
    let parsed = code.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("verbose error report: {:?}", code);
    }
    parsed
}

impl AtParseLine for ModemError {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        if let Some(code) = line.strip_prefix("+CME ERROR: ") {
            Ok(error_code(code)
                .map(|code| ModemError::CmeErr { code })
                .unwrap_or(ModemError::Generic))
        } else if let Some(code) = line.strip_prefix("+CMS ERROR: ") {
            Ok(error_code(code)
                .map(|code| ModemError::CmsErr { code })
                .unwrap_or(ModemError::Generic))
        } else {
            match line {
                "ERROR" => Ok(ModemError::Generic),
                "NO CARRIER" => Ok(ModemError::NoCarrier),
                "BUSY" => Ok(ModemError::Busy),
                "NO ANSWER" => Ok(ModemError::NoAnswer),
                "NO DIALTONE" => Ok(ModemError::NoDialtone),
                _ => Err("Not a valid error code".into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_result_codes() {
        assert_eq!(FinalResult::from_line("OK").ok(), Some(FinalResult::Ok));
        assert_eq!(
            FinalResult::from_line("+CME ERROR: 10").ok(),
            Some(FinalResult::Error(ModemError::CmeErr { code: 10 }))
        );
        assert_eq!(
            FinalResult::from_line("+CMS ERROR: 500").ok(),
            Some(FinalResult::Error(ModemError::CmsErr { code: 500 }))
        );
        assert_eq!(
            FinalResult::from_line("+CME ERROR: SIM not inserted").ok(),
            Some(FinalResult::Error(ModemError::Generic))
        );
        assert_eq!(
            FinalResult::from_line("BUSY").ok(),
            Some(FinalResult::Error(ModemError::Busy))
        );
        assert!(FinalResult::from_line("OK ").is_err());
        assert!(FinalResult::from_line("+CLCC: 1,0,0,0,0").is_err());
    }
}
