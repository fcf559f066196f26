//! Thread-safe shared byte queue with blocking read semantics.
//!
//! [`SharedByteQueue`] wraps a [`ByteQueue`] in a mutex and condition
//! variable, upgrading [`read`](SharedByteQueue::read) and
//! [`extract`](SharedByteQueue::extract) to block until their request can be
//! satisfied or the queue reaches a terminal state. It is the rendezvous
//! point between producers and consumers; the handles in
//! [`crate::handle`] share one instance behind an `Arc`.

use crate::error::Result;
use crate::queue::{ByteQueue, SeekOrigin};
use std::sync::{Condvar, Mutex};

/// A byte queue safe for concurrent producer/consumer use.
///
/// Every operation acquires the internal mutex; mutations that can change
/// what a blocked reader is waiting for (writes, close, error, extraction,
/// seeks, clears) broadcast on the condition variable so waiters re-check
/// their predicates.
///
/// # Blocking behavior
///
/// - `read(n)` with `n > 0` blocks until `n` bytes are available past the
///   read cursor, the queue is closed, or the queue is errored. On a closed
///   queue with fewer than `n` bytes left it returns whatever is available
///   (possibly nothing) as success; on an errored queue it fails.
/// - `extract(n)` with `n > 0` behaves the same against the total stored
///   byte count.
/// - `read(0)` and `extract(0)` never block; they return what is present
///   right now.
///
/// # Identity
///
/// A `SharedByteQueue` is not `Clone`: it is the shared meeting point, and
/// peers are defined by referring to the same instance. Share it behind an
/// [`Arc`](std::sync::Arc), or use the handle types which do so already.
#[derive(Debug, Default)]
pub struct SharedByteQueue {
    state: Mutex<ByteQueue>,
    changed: Condvar,
}

impl SharedByteQueue {
    /// Create an empty shared queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty shared queue with `capacity` bytes pre-allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(ByteQueue::with_capacity(capacity)),
            changed: Condvar::new(),
        }
    }

    /// Current number of bytes stored.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().len()
    }

    /// Check if the queue holds no data.
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().is_empty()
    }

    /// Number of bytes immediately readable from the current cursor.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().unwrap().available_bytes()
    }

    /// Current allocation, in bytes.
    pub fn capacity(&self) -> usize {
        self.state.lock().unwrap().capacity()
    }

    /// Ensure the allocation can hold at least `total` bytes.
    pub fn reserve(&self, total: usize) {
        self.state.lock().unwrap().reserve(total);
    }

    /// Whether writes are currently accepted.
    pub fn is_writable(&self) -> bool {
        self.state.lock().unwrap().is_writable()
    }

    /// Whether reads are currently accepted.
    pub fn is_readable(&self) -> bool {
        self.state.lock().unwrap().is_readable()
    }

    /// Whether the queue has been closed for writing.
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().is_closed()
    }

    /// Whether the queue is at end-of-stream (errored, or closed and fully
    /// read).
    pub fn eof(&self) -> bool {
        self.state.lock().unwrap().eof()
    }

    /// Append bytes at the tail and wake any blocked readers.
    ///
    /// Returns `false` when the queue is closed or errored, or for empty
    /// input; nothing is appended and no one is woken in that case.
    pub fn write(&self, data: impl AsRef<[u8]>) -> bool {
        let wrote = self.state.lock().unwrap().write(data);
        if wrote {
            self.changed.notify_all();
        }
        wrote
    }

    /// Blocking non-destructive read.
    ///
    /// See the type-level docs for the blocking rules. The returned bytes
    /// stay in the queue; the read cursor advances past them.
    pub fn read(&self, count: usize) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        if count == 0 {
            return state.read(0);
        }
        while state.available_bytes() < count && !state.is_closed() && state.is_readable() {
            state = self.changed.wait(state).unwrap();
        }
        if state.available_bytes() < count {
            // Closed with a short remainder: drain-on-close. Errored: the
            // inner read fails with the not-readable error.
            return state.read(0);
        }
        state.read(count)
    }

    /// Blocking destructive read from the head.
    ///
    /// See the type-level docs for the blocking rules. Removing bytes moves
    /// every peer's view of the head, so waiters are woken afterwards.
    pub fn extract(&self, count: usize) -> Result<Vec<u8>> {
        let result = {
            let mut state = self.state.lock().unwrap();
            if count == 0 {
                state.extract(0)
            } else {
                while state.len() < count && !state.is_closed() && state.is_readable() {
                    state = self.changed.wait(state).unwrap();
                }
                if state.len() < count {
                    state.extract(0)
                } else {
                    state.extract(count)
                }
            }
        };
        if let Ok(bytes) = &result {
            if !bytes.is_empty() {
                self.changed.notify_all();
            }
        }
        result
    }

    /// Close the queue for further writes and wake all waiters. Idempotent.
    pub fn close(&self) {
        self.state.lock().unwrap().close();
        self.changed.notify_all();
    }

    /// Put the queue in the error state and wake all waiters. Idempotent.
    ///
    /// Blocked readers wake up and fail; subsequent writes are rejected.
    pub fn set_error(&self) {
        self.state.lock().unwrap().set_error();
        self.changed.notify_all();
    }

    /// Drop all content, reset the cursor, and wake all waiters.
    pub fn clear(&self) {
        self.state.lock().unwrap().clear();
        self.changed.notify_all();
    }

    /// Drop the already-read prefix, reset the cursor, and wake all waiters.
    pub fn clean(&self) {
        self.state.lock().unwrap().clean();
        self.changed.notify_all();
    }

    /// Move the read cursor and wake all waiters.
    ///
    /// Waking matters here: seeking backwards can raise `available_bytes`
    /// enough to satisfy a blocked read.
    pub fn seek(&self, offset: isize, origin: SeekOrigin) {
        self.state.lock().unwrap().seek(offset, origin);
        self.changed.notify_all();
    }
}
