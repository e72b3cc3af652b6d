use crate::at_command::{AtParseErr, AtParseLine, Number};
use crate::tokenizer;

/// Caller line identification, reported after `RING` when enabled with `AT+CLIP=1`.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallerId {
    /// `None` if the caller withheld their number.
    pub number: Option<Number>,
}

impl AtParseLine for CallerId {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        // +CLIP: "+15551234567",145,,,,0
        let fields = line.strip_prefix("+CLIP:").ok_or("Missing '+CLIP:'")?;
        let number = tokenizer::element(0, fields)
            .filter(|number| !number.is_empty())
            .map(Number::new);

        Ok(CallerId { number })
    }
}
