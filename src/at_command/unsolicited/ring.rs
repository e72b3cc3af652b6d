use crate::at_command::{AtParseErr, AtParseLine};

/// An incoming call is ringing. Repeated for every ring.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ring;

impl AtParseLine for Ring {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        line.eq("RING")
            .then(|| Ring)
            .ok_or_else(|| "Missing 'RING'".into())
    }
}
