mod command;
mod context;

use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};

use crate::{
    at_command::{
        unsolicited::Urc, Answer, At, CallList, ConfigValue, Dial, EnterPin, GetRegistration,
        GetSimStatus, HangUp, ListCalls, Number, PowerDown, QueryConfig, Reboot, Registration,
        SetConfig, SetEcho, SimStatus,
    },
    log,
    pump::{RxPump, TxPump},
    read::ModemReadBuffer,
    util::Lagged,
    Error,
};
pub use command::{CommandRunner, CommandRunnerGuard, AT_DEFAULT_TIMEOUT};
pub use context::*;

/// How long to wait for the modem to answer a probe during [Modem::init].
const PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Helper macro that repeatedly attempts to evaluate an expression that returns a result.
///
/// Returns the Result yielded by the expression if
/// - the expression returns `Ok` at any point,
/// - or the expression returns `Err` $attempts time in a row.
macro_rules! try_retry {
    (($label:literal, $attempts:literal, $delay: expr), $e:expr) => {{
        let mut attempt = 0;
        loop {
            let r = $e;

            if r.is_ok() || attempt >= $attempts {
                break r;
            }

            attempt += 1;
            log::warn!(
                "{} failed, attempt {}/{}, retrying after {:?}",
                $label,
                attempt,
                $attempts,
                $delay
            );
            Timer::after($delay).await;
        }
    }};
}

/// Handle for talking to the modem.
///
/// Every method takes the command lock for the duration of one command.
pub struct Modem<'c> {
    context: &'c ModemContext,
    commands: CommandRunner<'c>,
}

impl<'c> Modem<'c> {
    /// Wire a transport up to `context`.
    ///
    /// Both pumps must be run for any command to complete.
    pub fn new<R: Read, W: Write>(
        context: &'c ModemContext,
        reader: R,
        writer: W,
    ) -> (Modem<'c>, RxPump<'c, R>, TxPump<'c, W>) {
        let modem = Modem {
            context,
            commands: context.commands(),
        };

        let rx_pump = RxPump {
            reader,
            buffer: ModemReadBuffer::new(),
            context,
        };

        let tx_pump = TxPump { writer, context };

        (modem, rx_pump, tx_pump)
    }

    /// Wait until the modem responds, then turn command echo off.
    pub async fn init(&mut self) -> Result<(), Error> {
        log::info!("initializing modem");
        let mut commands = self.commands.lock().await;

        // The modem ignores commands for a few seconds after power on.
        try_retry!(
            ("AT", 10, Duration::from_millis(500)),
            commands.run_with_timeout(Some(PROBE_TIMEOUT), At).await
        )?;
        commands.run(SetEcho(false)).await?;

        log::info!("modem successfully initialized");
        Ok(())
    }

    pub fn commands(&self) -> &CommandRunner<'c> {
        &self.commands
    }

    /// Wait for the next unsolicited message, e.g. an incoming call.
    pub async fn next_urc(&self) -> Result<Urc, Lagged> {
        self.context.next_urc().await
    }

    pub async fn list_calls(&self) -> Result<CallList, Error> {
        self.commands.lock().await.run(ListCalls).await
    }

    pub async fn answer(&self) -> Result<(), Error> {
        self.commands.lock().await.run(Answer).await?;
        Ok(())
    }

    pub async fn hang_up(&self) -> Result<(), Error> {
        self.commands.lock().await.run(HangUp).await?;
        Ok(())
    }

    /// Start a voice call to `number`.
    pub async fn dial(&self, number: &str) -> Result<(), Error> {
        self.commands
            .lock()
            .await
            .run(Dial(Number::new(number)))
            .await?;
        Ok(())
    }

    pub async fn sim_status(&self) -> Result<SimStatus, Error> {
        self.commands.lock().await.run(GetSimStatus).await
    }

    pub async fn enter_pin(&self, pin: &str) -> Result<(), Error> {
        self.commands.lock().await.run(EnterPin(pin)).await?;
        Ok(())
    }

    pub async fn registration(&self) -> Result<Registration, Error> {
        self.commands.lock().await.run(GetRegistration).await
    }

    pub async fn query_config(&self, name: &str) -> Result<ConfigValue, Error> {
        self.commands.lock().await.run(QueryConfig(name)).await
    }

    /// Set extended configuration `name`. String values must carry their own quotes.
    pub async fn set_config(&self, name: &str, value: &str) -> Result<(), Error> {
        self.commands
            .lock()
            .await
            .run(SetConfig { name, value })
            .await?;
        Ok(())
    }

    /// Restart the modem. Expect [Urc::Ready] once it is back.
    pub async fn reboot(&self) -> Result<(), Error> {
        self.commands.lock().await.run(Reboot).await?;
        Ok(())
    }

    /// Power the modem off. Expect [Urc::PoweredDown] once it is done.
    pub async fn power_down(&self) -> Result<(), Error> {
        self.commands.lock().await.run(PowerDown).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::{cell::RefCell, convert::Infallible, future::poll_fn, task::Poll};
    use std::{collections::VecDeque, format, vec::Vec};

    use embassy_futures::{block_on, join::join};
    use embedded_io_async::{ErrorKind, ErrorType};

    use super::*;
    use crate::{
        at_command::{
            unsolicited::{CallerId, Ring},
            AtRequest, CallState, GenericOk, ModemError,
        },
        pump::Pump,
    };

    /// Receive side of an in-memory serial line. Reads wait until bytes are available.
    struct Wire<'a>(&'a RefCell<VecDeque<u8>>);

    impl ErrorType for Wire<'_> {
        type Error = Infallible;
    }

    impl Read for Wire<'_> {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            poll_fn(|_| {
                let mut bytes = self.0.borrow_mut();
                if bytes.is_empty() {
                    return Poll::Pending;
                }
                let n = buf.len().min(bytes.len());
                for (slot, byte) in buf.iter_mut().zip(bytes.drain(..n)) {
                    *slot = byte;
                }
                Poll::Ready(Ok(n))
            })
            .await
        }
    }

    #[derive(Default)]
    struct Sink(Vec<u8>);

    impl ErrorType for Sink {
        type Error = Infallible;
    }

    impl Write for Sink {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        async fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct Broken;

    impl ErrorType for Broken {
        type Error = ErrorKind;
    }

    impl Write for Broken {
        async fn write(&mut self, _buf: &[u8]) -> Result<usize, ErrorKind> {
            Err(ErrorKind::Other)
        }

        async fn flush(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }
    }

    /// Plays the modem: answers each command written by `tx` with the next reply.
    async fn respond<'c>(
        rx: &mut RxPump<'c, Wire<'_>>,
        tx: &mut TxPump<'c, Sink>,
        wire: &RefCell<VecDeque<u8>>,
        replies: &[&[u8]],
    ) {
        for reply in replies {
            tx.pump().await.unwrap();
            wire.borrow_mut().extend(reply.iter());
            while !wire.borrow().is_empty() {
                rx.pump().await.unwrap();
            }
        }
    }

    #[test]
    fn init_probes_then_disables_echo() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (mut modem, mut rx, mut tx) = Modem::new(&context, Wire(&wire), Sink::default());

        let (result, _) = block_on(join(
            modem.init(),
            respond(&mut rx, &mut tx, &wire, &[b"AT\r\r\nOK\r\n", b"ATE0\r\r\nOK\r\n"]),
        ));

        assert_eq!(result, Ok(()));
        assert_eq!(tx.writer.0, b"AT\r\nATE0\r\n");
    }

    #[test]
    fn reply_with_interleaved_urc() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (modem, mut rx, mut tx) = Modem::new(&context, Wire(&wire), Sink::default());

        let reply: &[u8] = b"AT+CLCC\r\r\n\
            +CLCC: 1,1,4,0,0,\"+15551234567\",145\r\n\
            RING\r\n\
            OK\r\n";
        let (result, _) = block_on(join(
            modem.list_calls(),
            respond(&mut rx, &mut tx, &wire, &[reply]),
        ));

        let calls = result.unwrap().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].state, CallState::Incoming);
        assert_eq!(
            calls[0].number.as_ref().map(Number::as_str),
            Some("+15551234567")
        );

        assert_eq!(context.urcs.try_recv(), Some(Ok(Urc::Ring(Ring))));
        assert!(!context.awaiting_reply());
    }

    #[test]
    fn error_result_code() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (modem, mut rx, mut tx) = Modem::new(&context, Wire(&wire), Sink::default());

        let (result, _) = block_on(join(
            modem.dial("5550000"),
            respond(&mut rx, &mut tx, &wire, &[b"BUSY\r\n"]),
        ));

        assert_eq!(result, Err(Error::Modem(ModemError::Busy)));
        assert_eq!(tx.writer.0, b"ATD5550000;\r\n");
    }

    #[test]
    fn reply_longer_than_the_reply_queue() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (modem, mut rx, mut tx) = Modem::new(&context, Wire(&wire), Sink::default());

        let mut reply = Vec::from(&b"AT+CLCC\r\r\n"[..]);
        for index in 1..=7 {
            reply.extend_from_slice(format!("+CLCC: {index},0,0,0,0,\"1\",129\r\n").as_bytes());
        }
        reply.extend_from_slice(b"OK\r\n");

        let (result, _) = block_on(join(
            modem.list_calls(),
            respond(&mut rx, &mut tx, &wire, &[reply.as_slice()]),
        ));

        let calls = result.unwrap().calls;
        assert_eq!(calls.len(), 7);
        assert_eq!(calls[6].index, 7);
        assert_eq!(context.urcs.try_recv(), None);
    }

    #[test]
    fn urc_right_behind_final_result_code() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (modem, mut rx, mut tx) = Modem::new(&context, Wire(&wire), Sink::default());

        let (result, _) = block_on(join(
            modem.hang_up(),
            respond(&mut rx, &mut tx, &wire, &[b"OK\r\nRING\r\nOK\r\n"]),
        ));
        assert_eq!(result, Ok(()));

        // the stray OK is dropped, the RING is not
        assert_eq!(context.urcs.try_recv(), Some(Ok(Urc::Ring(Ring))));
        assert_eq!(context.urcs.try_recv(), None);

        let (result, _) = block_on(join(
            modem.answer(),
            respond(&mut rx, &mut tx, &wire, &[b"ATA\r\r\nOK\r\n"]),
        ));
        assert_eq!(result, Ok(()));
        assert_eq!(tx.writer.0, b"ATH\r\nATA\r\n");
    }

    #[test]
    fn idle_lines_become_urcs() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (modem, mut rx, _tx) = Modem::new(&context, Wire(&wire), Sink::default());

        wire.borrow_mut()
            .extend(b"RING\r\ngarbage\r\n+CLIP: \"+15551234567\",145\r\n".iter());
        block_on(rx.pump()).unwrap();

        assert_eq!(block_on(modem.next_urc()), Ok(Urc::Ring(Ring)));
        assert_eq!(
            block_on(modem.next_urc()),
            Ok(Urc::CallerId(CallerId {
                number: Some(Number::new("+15551234567"))
            }))
        );
        assert_eq!(context.urcs.try_recv(), None);
    }

    #[test]
    fn timeout_clears_pending_reply() {
        let context = ModemContext::new();
        let runner = context.commands();

        let result = block_on(async {
            let guard = runner
                .lock()
                .await
                .with_timeout(Some(Duration::from_millis(10)));
            guard.run(At).await
        });

        assert_eq!(result, Err::<GenericOk, _>(Error::Timeout));
        assert!(!context.awaiting_reply());
    }

    #[test]
    fn write_failure_is_a_serial_error() {
        let context = ModemContext::new();
        let wire = RefCell::new(VecDeque::new());
        let (_modem, _rx, mut tx) = Modem::new(&context, Wire(&wire), Broken);

        context.commands.try_send(At.encode()).unwrap();
        assert_eq!(block_on(tx.pump()), Err(Error::Serial));
    }
}
