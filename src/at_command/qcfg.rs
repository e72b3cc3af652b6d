use heapless::String;

use super::{catalogue, AtParseErr, AtParseLine, AtRequest, AtResponse, Command, GenericOk};
use crate::{line::Line, log, tokenizer, util::push_truncated, MAX_LINE_LEN};

/// AT+QCFG="<name>"
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueryConfig<'a>(pub &'a str);

/// AT+QCFG="<name>",<value>
///
/// `value` is sent verbatim, so string values must carry their own quotes.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetConfig<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// A `+QCFG: "<name>",<values>` line.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigValue {
    pub name: String<32>,

    /// Everything after the name, unparsed.
    pub values: String<MAX_LINE_LEN>,
}

impl AtRequest for QueryConfig<'_> {
    type Response = ConfigValue;
    fn encode(&self) -> Command {
        Command::from_fmt(format_args!("{}\"{}\"", catalogue::CONFIG, self.0))
    }
}

impl AtRequest for SetConfig<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Command {
        Command::from_fmt(format_args!(
            "{}\"{}\",{}",
            catalogue::CONFIG,
            self.name,
            self.value
        ))
    }
}

impl AtParseLine for ConfigValue {
    fn from_line(line: &str) -> Result<Self, AtParseErr> {
        let rest = line.strip_prefix("+QCFG: ").ok_or("Missing '+QCFG: '")?;
        let name = tokenizer::element(0, rest).ok_or("Missing name")?;
        let values = rest
            .split_once(',')
            .map(|(_, values)| values)
            .unwrap_or_default();

        let mut value = ConfigValue::default();
        push_truncated(&mut value.name, name);
        if !push_truncated(&mut value.values, values) {
            log::warn!("config values truncated: {:?}", values);
        }
        Ok(value)
    }
}

impl AtResponse for ConfigValue {
    fn accept(&mut self, line: &Line<'_>) -> bool {
        match line.as_str().map(ConfigValue::from_line) {
            Some(Ok(value)) => {
                *self = value;
                true
            }
            _ => false,
        }
    }
}
