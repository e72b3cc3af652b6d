//! Command strings understood by Quectel EG25/EC2x modems.
//!
//! The protocol engine treats these as opaque text. The typed requests in
//! [crate::at_command] are built from them.

/// Liveness check
pub const AT: &str = "AT";

/// Answer an incoming call
pub const ANSWER: &str = "ATA";

/// Dial prefix, followed by the number and `;` for a voice call
pub const DIAL: &str = "ATD";

/// Hang up all calls
pub const HANG_UP: &str = "ATH";

pub const ECHO_OFF: &str = "ATE0";
pub const ECHO_ON: &str = "ATE1";

/// List current calls
pub const LIST_CALLS: &str = "AT+CLCC";

/// Power down the module, it replies `OK` and later `POWERED DOWN`
pub const POWER_DOWN: &str = "AT+QPOWD";

/// Prefix of extended configuration queries and settings
pub const CONFIG: &str = "AT+QCFG=";

/// Full functionality, with a reset
pub const REBOOT: &str = "AT+CFUN=1,1";

pub const SIM_STATUS: &str = "AT+CPIN?";

/// Prefix of PIN entry, followed by the quoted PIN
pub const ENTER_PIN: &str = "AT+CPIN=";

pub const REGISTRATION: &str = "AT+CREG?";
