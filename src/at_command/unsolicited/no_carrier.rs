use crate::at_command::{AtParseErr, AtParseLine};

/// A call ended, or the remote end hung up.
///
/// While a command is outstanding `NO CARRIER` is its final result code instead.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallEnded;

impl AtParseLine for CallEnded {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        line.eq("NO CARRIER")
            .then(|| CallEnded)
            .ok_or_else(|| "Missing 'NO CARRIER'".into())
    }
}
