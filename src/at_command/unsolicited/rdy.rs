use crate::at_command::{AtParseErr, AtParseLine};

/// The modem has booted and accepts commands.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ready;

impl AtParseLine for Ready {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        line.eq("RDY")
            .then(|| Ready)
            .ok_or_else(|| "Missing 'RDY'".into())
    }
}
