use core::{
    cell::RefCell,
    fmt::Debug,
    future::{poll_fn, Future},
    task::Poll,
};

use embassy_sync::{blocking_mutex, blocking_mutex::raw::RawMutex, waitqueue::WakerRegistration};
use heapless::{Deque, String};

/// Append as much of `text` to `s` as fits, stopping at a char boundary.
///
/// Returns `false` if `text` had to be cut short.
pub(crate) fn push_truncated<const N: usize>(s: &mut String<N>, text: &str) -> bool {
    if s.push_str(text).is_ok() {
        return true;
    }
    for c in text.chars() {
        if s.push(c).is_err() {
            break;
        }
    }
    false
}

/// A fixed-capacity broadcast queue for modem events that must never block the receive path.
///
/// Sending into a full channel evicts the oldest message and flags the receiver as lagged.
pub struct RingChannel<M: RawMutex, T, const N: usize> {
    inner: blocking_mutex::Mutex<M, RefCell<Ring<T, N>>>,
}

struct Ring<T, const N: usize> {
    queue: Deque<T, N>,
    lagged: bool,
    waker: WakerRegistration,
}

/// Messages were dropped from a [RingChannel] since the last receive.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lagged;

impl<M: RawMutex, T: Debug, const N: usize> RingChannel<M, T, N> {
    pub const fn new() -> Self {
        RingChannel {
            inner: blocking_mutex::Mutex::new(RefCell::new(Ring {
                queue: Deque::new(),
                lagged: false,
                waker: WakerRegistration::new(),
            })),
        }
    }

    /// Queue `message`, evicting the oldest one if the channel is full.
    pub fn send(&self, message: T) {
        self.inner.lock(|ring| {
            let mut ring = ring.borrow_mut();
            if ring.queue.is_full() {
                let _ = ring.queue.pop_front();
                ring.lagged = true;
            }
            // there is room, we just made sure of it
            let _ = ring.queue.push_back(message);
            ring.waker.wake();
        })
    }

    /// Take the oldest message without waiting.
    ///
    /// Returns `Some(Err(Lagged))` once after messages were evicted.
    pub fn try_recv(&self) -> Option<Result<T, Lagged>> {
        self.inner.lock(|ring| {
            let mut ring = ring.borrow_mut();
            if ring.lagged {
                ring.lagged = false;
                Some(Err(Lagged))
            } else {
                ring.queue.pop_front().map(Ok)
            }
        })
    }

    /// Wait for the next message. See [RingChannel::try_recv].
    pub fn recv(&self) -> impl Future<Output = Result<T, Lagged>> + '_ {
        poll_fn(|cx| match self.try_recv() {
            Some(result) => Poll::Ready(result),
            None => {
                self.inner
                    .lock(|ring| ring.borrow_mut().waker.register(cx.waker()));
                Poll::Pending
            }
        })
    }
}

impl<M: RawMutex, T: Debug, const N: usize> Default for RingChannel<M, T, N> {
    fn default() -> Self {
        Self::new()
    }
}
