//! Fair token bucket bounding in-flight work.
//!
//! # Responsibilities
//! - Hand out at most `capacity` permits at a time
//! - Queue callers beyond capacity and wake them in arrival order
//! - Let a queued caller give up without leaking a permit
//!
//! # Algorithm
//! ```text
//! acquire: tokens > 0  → tokens -= 1, return permit
//!          tokens == 0 → enqueue waiter, suspend until granted or cancelled
//! release: waiter queued → hand the permit straight to the oldest waiter
//!          queue empty   → tokens += 1
//! ```
//!
//! # Invariants
//! - `available + outstanding == capacity` whenever no waiter is queued
//! - `available == 0` whenever a waiter is queued
//!
//! # Design Decisions
//! - A released permit never passes through the counter while someone waits,
//!   so a newcomer cannot overtake a queued caller
//! - A cancelled or dropped waiter removes itself under the lock; if a permit
//!   reached it first, it is released again on the spot

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::concurrency::Cancellation;

/// Errors returned by [`TokenBucket::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// The caller cancelled while waiting for a permit.
    #[error("permit acquisition cancelled")]
    Cancelled,
}

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    grant: oneshot::Sender<()>,
}

#[derive(Debug)]
struct State {
    tokens: usize,
    waiters: VecDeque<Waiter>,
    next_ticket: u64,
}

impl State {
    /// Return one permit: wake the oldest live waiter, else bump the counter.
    fn release(&mut self) {
        while let Some(waiter) = self.waiters.pop_front() {
            if waiter.grant.send(()).is_ok() {
                return;
            }
        }
        self.tokens += 1;
    }
}

/// A counting limiter with FIFO wakeups and cancellable acquisition.
pub struct TokenBucket {
    capacity: usize,
    state: Mutex<State>,
}

impl TokenBucket {
    /// Create a bucket holding `capacity` permits.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "token bucket capacity must be positive");
        Self {
            capacity,
            state: Mutex::new(State {
                tokens: capacity,
                waiters: VecDeque::new(),
                next_ticket: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every transition is a single counter change or queue push/pop,
        // so the state is consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently available without waiting.
    pub fn available(&self) -> usize {
        self.lock().tokens
    }

    /// Number of callers queued for a permit.
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(self: &Arc<Self>) -> Option<Permit> {
        let mut state = self.lock();
        if state.tokens == 0 {
            return None;
        }
        state.tokens -= 1;
        Some(Permit {
            bucket: Arc::clone(self),
        })
    }

    /// Take a permit, suspending until one is handed over.
    ///
    /// Returns [`AcquireError::Cancelled`] as soon as `cancellation` fires;
    /// the caller then holds nothing and the queue no longer references it.
    pub async fn acquire(self: &Arc<Self>, cancellation: &Cancellation) -> Result<Permit, AcquireError> {
        if cancellation.is_cancelled() {
            return Err(AcquireError::Cancelled);
        }

        let (ticket, receiver) = {
            let mut state = self.lock();
            if state.tokens > 0 {
                state.tokens -= 1;
                return Ok(Permit {
                    bucket: Arc::clone(self),
                });
            }

            let ticket = state.next_ticket;
            state.next_ticket += 1;
            let (grant, receiver) = oneshot::channel();
            state.waiters.push_back(Waiter { ticket, grant });
            (ticket, receiver)
        };

        tracing::trace!(ticket, "Waiting for permit");
        let mut pending = PendingAcquire {
            bucket: self.as_ref(),
            ticket,
            receiver,
            settled: false,
        };

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                tracing::trace!(ticket, "Permit wait cancelled");
                Err(AcquireError::Cancelled)
            }
            granted = &mut pending.receiver => {
                pending.settled = true;
                // A sender is only dropped by sending, or by our own cleanup.
                granted.map_err(|_| AcquireError::Cancelled)?;
                Ok(Permit {
                    bucket: Arc::clone(self),
                })
            }
        }
    }

    fn release(&self) {
        let mut state = self.lock();
        state.release();
        debug_assert!(state.tokens <= self.capacity);
    }
}

impl fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("available", &state.tokens)
            .field("waiting", &state.waiters.len())
            .finish()
    }
}

/// A queued acquisition. Cleans up the queue if dropped before settling.
struct PendingAcquire<'a> {
    bucket: &'a TokenBucket,
    ticket: u64,
    receiver: oneshot::Receiver<()>,
    settled: bool,
}

impl Drop for PendingAcquire<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut state = self.bucket.lock();
        if let Some(index) = state.waiters.iter().position(|w| w.ticket == self.ticket) {
            state.waiters.remove(index);
        } else if self.receiver.try_recv().is_ok() {
            // Granted after we stopped waiting: pass the permit on.
            state.release();
        }
    }
}

/// A held permit. Returned to the bucket on drop.
pub struct Permit {
    bucket: Arc<TokenBucket>,
}

impl fmt::Debug for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit")
            .field("capacity", &self.bucket.capacity)
            .finish()
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.bucket.release();
    }
}
