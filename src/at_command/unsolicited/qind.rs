use heapless::String;

use crate::at_command::{AtParseErr, AtParseLine};
use crate::util::push_truncated;

/// Quectel status indication, e.g. `+QIND: SMS DONE` or `+QIND: "FOTA","HTTPEND",0`.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indication {
    /// The indication, unparsed. Truncated to 64 bytes.
    pub payload: String<64>,
}

impl AtParseLine for Indication {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        let payload = line.strip_prefix("+QIND: ").ok_or("Missing '+QIND: '")?;
        let mut indication = Indication {
            payload: String::new(),
        };
        push_truncated(&mut indication.payload, payload);
        Ok(indication)
    }
}
