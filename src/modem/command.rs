use core::{future::Future, mem};

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    mutex::{Mutex, MutexGuard},
};
use embassy_time::{with_timeout, Duration, TimeoutError};

use crate::{
    at_command::AtRequest,
    dispatch::{Event, Transaction},
    line::Line,
    log,
    modem::ModemContext,
    Error,
};

/// The default timeout of AT commands
pub const AT_DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CommandRunner<'a> {
    command_lock: &'a Mutex<CriticalSectionRawMutex, ()>,
    context: &'a ModemContext,
}

impl<'a> CommandRunner<'a> {
    pub fn create(ctx: &'a ModemContext) -> Self {
        CommandRunner {
            command_lock: &ctx.command_lock,
            context: ctx,
        }
    }

    /// Take exclusive use of the modem until the guard is dropped.
    pub async fn lock(&'a self) -> CommandRunnerGuard<'a> {
        CommandRunnerGuard {
            _commands_guard: self.command_lock.lock().await,
            context: self.context,
            timeout: Some(AT_DEFAULT_TIMEOUT),
        }
    }
}

pub struct CommandRunnerGuard<'a> {
    _commands_guard: MutexGuard<'a, CriticalSectionRawMutex, ()>,
    context: &'a ModemContext,
    timeout: Option<Duration>,
}

impl<'a> CommandRunnerGuard<'a> {
    /// Run a future with the timeout configured for self
    async fn timeout<T, F: Future<Output = T>>(&self, future: F) -> Result<T, TimeoutError> {
        Ok(match self.timeout {
            Some(timeout) => with_timeout(timeout, future).await?,
            None => future.await,
        })
    }

    /// Send `request` and fold reply lines into its response until a final result code.
    async fn exchange<R: AtRequest>(&self, request: &R) -> Result<R::Response, Error> {
        let mut transaction = Transaction::start(request);
        self.context
            .commands
            .send(transaction.command().clone())
            .await;

        loop {
            let reply = self.context.replies.receive().await;

            match transaction.handle(&Line::new(&reply)) {
                Event::Complete(result) => return result.map_err(Error::Modem),
                Event::Unsolicited(urc) => {
                    log::debug!("Got URC: {:?}", urc);
                    self.context.urcs.send(urc);
                }
                Event::Noise if !reply.is_empty() => {
                    log::warn!("Got unexpected line: {:?}", reply.as_slice())
                }
                Event::Echo | Event::Intermediate | Event::Noise => {}
            }
        }
    }

    /// Send a request to the modem, and wait for the modem to respond.
    pub async fn run<R: AtRequest>(&self, command: R) -> Result<R::Response, Error> {
        self.context.flush_replies();
        self.context.set_awaiting_reply(true);

        let result = match self.timeout(self.exchange(&command)).await {
            Ok(result) => result,
            Err(timeout) => Err(timeout.into()),
        };

        // lines queued behind the final result code are not part of the reply
        self.context.set_awaiting_reply(false);
        self.context.flush_replies();
        log::trace!("Completed AT command: {:?}", command);

        if let Err(e) = &result {
            log::error!("AT command {:?} error: {:?}", command, e);
        }

        result
    }

    /// Send a request to the modem and wait for the modem to respond.
    ///
    /// Use the provided timeout value instead of the configured one.
    pub async fn run_with_timeout<R: AtRequest>(
        &mut self,
        mut timeout: Option<Duration>,
        command: R,
    ) -> Result<R::Response, Error> {
        mem::swap(&mut self.timeout, &mut timeout);
        let result = self.run(command).await;
        mem::swap(&mut self.timeout, &mut timeout);
        result
    }

    /// Set the timeout of subsequent commands
    ///
    /// Note that the timeout defaults to [AT_DEFAULT_TIMEOUT].
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }
}
