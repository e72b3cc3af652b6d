//! Tasks moving bytes between the transport and the [ModemContext].
//!
//! Both pumps are meant to be looped forever, e.g. with [pump_task](crate::pump_task).

use core::future::Future;

use embassy_time::with_timeout;
use embedded_io_async::{Read, Write};

use crate::{
    channel::render,
    dispatch,
    line::{Line, OwnedLine},
    log,
    modem::{ModemContext, AT_DEFAULT_TIMEOUT},
    read::{Fill, ModemReadBuffer},
    Error,
};

/// Size of a single transport read.
const RX_CHUNK_LEN: usize = 64;

pub trait Pump {
    type Err;

    fn pump(&mut self) -> impl Future<Output = Result<(), Self::Err>>;
}

/// Frames received bytes into lines and routes them.
///
/// While a command is outstanding every line goes to its runner, otherwise lines are parsed as
/// unsolicited messages. Reading stalls while the runner is behind on reply lines.
pub struct RxPump<'context, R> {
    pub(crate) reader: R,
    pub(crate) buffer: ModemReadBuffer,
    pub(crate) context: &'context ModemContext,
}

impl<'context, R: Read> Pump for RxPump<'context, R> {
    type Err = Error;

    async fn pump(&mut self) -> Result<(), Error> {
        let mut chunk = [0u8; RX_CHUNK_LEN];
        let bytes = self.reader.read(&mut chunk).await.map_err(|_| Error::Serial)?;
        if bytes == 0 {
            log::error!("modem transport closed");
            return Err(Error::Serial);
        }

        match core::str::from_utf8(&chunk[..bytes]) {
            Ok(text) => log::trace!("BYTES READ {:?}", text),
            Err(_) => log::trace!("READ INVALID {:?}", &chunk[..bytes]),
        }

        let mut received = &chunk[..bytes];
        while self.buffer.fill(&mut received) == Fill::Data {
            while let Some(line) = self.buffer.consume_line(|line| line.to_owned_line()) {
                route(self.context, line).await;
            }
        }

        Ok(())
    }
}

async fn route(context: &ModemContext, line: OwnedLine) {
    if line.is_empty() {
        return;
    }

    if context.awaiting_reply() {
        if with_timeout(AT_DEFAULT_TIMEOUT, context.replies.send(line))
            .await
            .is_err()
        {
            log::error!("reply queue send timed out");
        }
    } else if let Some(urc) = dispatch::unsolicited(&Line::new(&line)) {
        log::debug!("Got URC: {:?}", urc);
        context.urcs.send(urc);
    } else {
        // The modem likely sent us gibberish we could not understand.
        log::error!("Got unknown response: {:?}", line.as_slice());
    }
}

/// Writes queued commands to the transport.
pub struct TxPump<'context, W> {
    pub(crate) writer: W,
    pub(crate) context: &'context ModemContext,
}

impl<'context, W: Write> Pump for TxPump<'context, W> {
    type Err = Error;

    async fn pump(&mut self) -> Result<(), Error> {
        let command = self.context.commands.receive().await;
        let (rendered, _) = render(&command);

        log::debug!("Write to modem: {:?}", rendered.as_str());
        self.writer
            .write_all(rendered.as_bytes())
            .await
            .map_err(|_| Error::Serial)?;
        self.writer.flush().await.map_err(|_| Error::Serial)?;

        Ok(())
    }
}

/// Declare an embassy task that runs a [Pump] forever, logging its errors.
///
/// ```ignore
/// pump_task!(rx_pump, RxPump<'static, Uart>);
/// ```
#[macro_export]
macro_rules! pump_task {
    ($name:ident, $type:ty) => {
        #[embassy_executor::task]
        pub(crate) async fn $name(mut pump: $type) {
            use $crate::pump::Pump;
            loop {
                if let Err(err) = pump.pump().await {
                    #[cfg(feature = "log")]
                    log::error!("Error pumping {} {:?}", stringify!($name), err);
                    #[cfg(feature = "defmt")]
                    defmt::error!("Error pumping {} {:?}", stringify!($name), err);
                }
            }
        }
    };
}
