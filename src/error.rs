use embassy_time::TimeoutError;

use crate::at_command::ModemError;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The transport failed to read or write.
    Serial,

    /// The modem did not finish replying in time.
    Timeout,

    /// The modem replied with an error result code.
    Modem(ModemError),
}

impl From<TimeoutError> for Error {
    fn from(_: TimeoutError) -> Self {
        Error::Timeout
    }
}

impl From<ModemError> for Error {
    fn from(error: ModemError) -> Self {
        Error::Modem(error)
    }
}
