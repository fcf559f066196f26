//! Write-only and read-only views over a shared byte queue.
//!
//! [`WriteHandle`] and [`ReadHandle`] narrow a [`SharedByteQueue`] to one
//! side of the producer/consumer contract. Both are cheap reference-counted
//! values: cloning a handle, or deriving one side from the other, yields a
//! peer over the very same queue, and the queue lives until the last peer
//! is dropped.

use crate::error::Result;
use crate::queue::SeekOrigin;
use crate::shared::SharedByteQueue;
use std::sync::Arc;

/// Write-only view over a [`SharedByteQueue`].
///
/// A `WriteHandle` is how producers feed a stream: write bytes, then either
/// [`close`](Self::close) to announce graceful end-of-stream or
/// [`set_error`](Self::set_error) to abort it. The matching read side is
/// obtained with [`reader`](Self::reader).
///
/// # Example
///
/// ```
/// use pipeflow::handle::WriteHandle;
///
/// let writer = WriteHandle::new();
/// writer.write("Hello, World!");
/// writer.close();
///
/// let reader = writer.reader();
/// assert_eq!(reader.extract(13).unwrap(), b"Hello, World!");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WriteHandle {
    queue: Arc<SharedByteQueue>,
}

impl WriteHandle {
    /// Create a write handle owning a fresh queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a write handle owning a fresh queue with `capacity` bytes
    /// pre-allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Arc::new(SharedByteQueue::with_capacity(capacity)),
        }
    }

    /// Create a write handle over an existing reader's queue.
    ///
    /// The new handle is a peer of `reader`: bytes written through it are
    /// observable through `reader` and every other peer.
    pub fn from_reader(reader: &ReadHandle) -> Self {
        Self {
            queue: Arc::clone(&reader.queue),
        }
    }

    /// Append bytes to the stream.
    ///
    /// Returns `false` when the queue is closed or errored, or for empty
    /// input.
    pub fn write(&self, data: impl AsRef<[u8]>) -> bool {
        self.queue.write(data)
    }

    /// Close the stream for further writes. Idempotent.
    ///
    /// Consumers drain what is buffered and then observe end-of-stream.
    pub fn close(&self) {
        self.queue.close()
    }

    /// Abort the stream. Idempotent.
    ///
    /// Blocked readers wake up with an error; subsequent writes are
    /// rejected.
    pub fn set_error(&self) {
        self.queue.set_error()
    }

    /// Whether the stream still accepts writes.
    pub fn is_writable(&self) -> bool {
        self.queue.is_writable()
    }

    /// Create a read handle over the same queue.
    pub fn reader(&self) -> ReadHandle {
        ReadHandle {
            queue: Arc::clone(&self.queue),
        }
    }
}

/// Read-only view over a [`SharedByteQueue`].
///
/// A `ReadHandle` is how consumers take delivery of a stream, with the
/// blocking semantics of [`SharedByteQueue`]: [`read`](Self::read) is
/// non-destructive and cursor-driven, [`extract`](Self::extract) removes
/// bytes from the head. [`is_writable`](Self::is_writable) is exposed so a
/// consumer can tell whether more data may still arrive.
///
/// Read handles are only obtained from a [`WriteHandle`], which keeps every
/// stream reachable from its producing side.
#[derive(Debug, Clone)]
pub struct ReadHandle {
    queue: Arc<SharedByteQueue>,
}

impl ReadHandle {
    /// Blocking non-destructive read; see [`SharedByteQueue::read`].
    pub fn read(&self, count: usize) -> Result<Vec<u8>> {
        self.queue.read(count)
    }

    /// Blocking destructive read; see [`SharedByteQueue::extract`].
    pub fn extract(&self, count: usize) -> Result<Vec<u8>> {
        self.queue.extract(count)
    }

    /// Number of bytes immediately readable from the current cursor.
    pub fn available_bytes(&self) -> usize {
        self.queue.available_bytes()
    }

    /// Current number of bytes stored.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the queue holds no data.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether reads are currently accepted (the stream is not errored).
    pub fn is_readable(&self) -> bool {
        self.queue.is_readable()
    }

    /// Whether the stream still accepts writes from its producers.
    pub fn is_writable(&self) -> bool {
        self.queue.is_writable()
    }

    /// Whether the stream has been closed for writing.
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// Whether the stream is at end-of-stream.
    pub fn eof(&self) -> bool {
        self.queue.eof()
    }

    /// Move the read cursor; see [`SharedByteQueue::seek`].
    pub fn seek(&self, offset: isize, origin: SeekOrigin) {
        self.queue.seek(offset, origin)
    }

    /// Drop all buffered content. Affects every peer of this queue.
    pub fn clear(&self) {
        self.queue.clear()
    }
}
