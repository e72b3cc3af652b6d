use crate::at_command::{AtParseErr, AtParseLine};

/// The modem finished shutting down after `AT+QPOWD`, power may be cut.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoweredDown;

impl AtParseLine for PoweredDown {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        line.eq("POWERED DOWN")
            .then(|| PoweredDown)
            .ok_or_else(|| "Missing 'POWERED DOWN'".into())
    }
}
