//! Unsynchronized byte FIFO with a non-destructive read cursor.
//!
//! [`ByteQueue`] is the storage substrate of the crate: an ordered byte
//! sequence with destructive extraction from the head, a movable read
//! cursor for non-destructive reads, and terminal close/error flags.
//! It performs no locking; callers needing concurrent access wrap it in
//! [`SharedByteQueue`](crate::shared::SharedByteQueue).

use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Positioning mode for [`ByteQueue::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offsets are measured from the head of the buffer. Negative offsets
    /// are a no-op.
    Absolute,
    /// Offsets are signed deltas from the current read cursor.
    Relative,
}

/// A byte queue with a non-destructive read cursor.
///
/// Bytes are appended at the tail by [`write`](Self::write) and leave from
/// the head by [`extract`](Self::extract). [`read`](Self::read) copies bytes
/// out without removing them, advancing an internal cursor that
/// [`seek`](Self::seek) can reposition.
///
/// Two terminal flags govern the lifecycle: [`close`](Self::close) stops
/// further writes while letting readers drain what is buffered, and
/// [`set_error`](Self::set_error) stops both writes and reads. Both are
/// one-way; once raised they never reset.
///
/// # Example
///
/// ```
/// use pipeflow::queue::ByteQueue;
///
/// let mut queue = ByteQueue::new();
/// assert!(queue.write("Hello, World!"));
/// queue.close();
/// assert_eq!(queue.extract(13).unwrap(), b"Hello, World!");
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ByteQueue {
    data: VecDeque<u8>,
    initial_capacity: usize,
    cursor: usize,
    closed: bool,
    errored: bool,
}

impl ByteQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue with `capacity` bytes pre-allocated.
    ///
    /// The requested capacity is remembered and restored by
    /// [`clear`](Self::clear). Storage still grows on demand when writes
    /// outpace it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            initial_capacity: capacity,
            cursor: 0,
            closed: false,
            errored: false,
        }
    }

    /// Current number of bytes stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the queue holds no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes readable from the current cursor without failing.
    pub fn available_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.cursor)
    }

    /// Current allocation, in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Ensure the allocation can hold at least `total` bytes.
    pub fn reserve(&mut self, total: usize) {
        if total > self.data.capacity() {
            self.data.reserve(total - self.data.len());
        }
    }

    /// Whether writes are currently accepted (not closed and not errored).
    pub fn is_writable(&self) -> bool {
        !self.closed && !self.errored
    }

    /// Whether reads are currently accepted (not errored).
    pub fn is_readable(&self) -> bool {
        !self.errored
    }

    /// Whether the queue has been closed for writing.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the queue is at end-of-stream.
    ///
    /// True once the queue is errored, or closed with no unread bytes left
    /// past the cursor. A closed queue that still holds unread data is not
    /// yet at end-of-stream.
    pub fn eof(&self) -> bool {
        self.errored || (self.closed && self.available_bytes() == 0)
    }

    /// Append bytes at the tail.
    ///
    /// Returns `false` without touching the queue when it is closed or
    /// errored, and also for empty input. The two cases are not
    /// distinguished here; callers that care test
    /// [`is_writable`](Self::is_writable).
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> bool {
        let data = data.as_ref();
        if !self.is_writable() || data.is_empty() {
            return false;
        }
        self.data.extend(data.iter().copied());
        true
    }

    /// Non-destructive read from the current cursor.
    ///
    /// Copies `count` bytes starting at the cursor and advances it. With
    /// `count == 0`, returns everything from the cursor to the tail
    /// (possibly nothing) and moves the cursor to the tail. Fails without
    /// side effects when the queue is errored, or when fewer than `count`
    /// bytes are available past the cursor.
    pub fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(Error::InsufficientData("buffer is not readable".into()));
        }
        let available = self.available_bytes();
        if count > available {
            return Err(Error::InsufficientData("insufficient data to read".into()));
        }
        let to_read = if count == 0 { available } else { count };
        let out: Vec<u8> = self.data.iter().skip(self.cursor).take(to_read).copied().collect();
        self.cursor += to_read;
        Ok(out)
    }

    /// Destructive read from the head.
    ///
    /// Removes and returns `count` bytes from the head. With `count == 0`,
    /// drains the whole content (possibly nothing). The read cursor is pulled
    /// back by the number of bytes removed, stopping at the head. Fails
    /// without side effects when the queue is errored, or when it holds fewer
    /// than `count` bytes.
    pub fn extract(&mut self, count: usize) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(Error::InsufficientData("buffer is not readable".into()));
        }
        if count > self.data.len() {
            return Err(Error::InsufficientData(
                "insufficient data to extract".into(),
            ));
        }
        if count == 0 || count == self.data.len() {
            // Whole-content drain takes the storage wholesale.
            let out = Vec::from(std::mem::take(&mut self.data));
            self.cursor = 0;
            return Ok(out);
        }
        let out: Vec<u8> = self.data.drain(..count).collect();
        self.cursor = self.cursor.saturating_sub(count);
        Ok(out)
    }

    /// Close the queue for further writes. Idempotent.
    ///
    /// Buffered bytes remain readable until drained.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Put the queue in the error state. Idempotent.
    ///
    /// Subsequent writes are rejected and reads fail, even if bytes are
    /// still buffered.
    pub fn set_error(&mut self) {
        self.errored = true;
    }

    /// Drop all content and reset the cursor to the head.
    ///
    /// Restores the constructor-requested capacity. Terminal flags are not
    /// reset.
    pub fn clear(&mut self) {
        self.data = VecDeque::with_capacity(self.initial_capacity);
        self.cursor = 0;
    }

    /// Drop the already-read prefix (everything before the cursor) and reset
    /// the cursor to the head. Terminal flags are not reset.
    pub fn clean(&mut self) {
        self.data.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Move the read cursor.
    ///
    /// `SeekOrigin::Absolute` places the cursor at `offset` from the head;
    /// a negative absolute offset is a no-op. `SeekOrigin::Relative` moves
    /// the cursor by `offset` from its current position. The result is
    /// clamped to `[0, len]` in both modes. Stored data is unaffected.
    pub fn seek(&mut self, offset: isize, origin: SeekOrigin) {
        let len = self.data.len();
        match origin {
            SeekOrigin::Absolute => {
                if offset < 0 {
                    return;
                }
                self.cursor = (offset as usize).min(len);
            }
            SeekOrigin::Relative => {
                let target = self.cursor as isize + offset;
                self.cursor = target.clamp(0, len as isize) as usize;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_extract_round_trip() {
        let mut queue = ByteQueue::new();
        assert!(queue.write(b"Hello, World!"));
        assert_eq!(queue.len(), 13);
        assert_eq!(queue.extract(13).unwrap(), b"Hello, World!");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_write_empty_input_is_rejected() {
        let mut queue = ByteQueue::new();
        assert!(!queue.write(b""));
        assert!(queue.is_empty());
        // Still writable; the rejection was about the input, not the queue.
        assert!(queue.is_writable());
    }

    #[test]
    fn test_write_after_close_is_rejected() {
        let mut queue = ByteQueue::new();
        assert!(queue.write("ABC"));
        queue.close();
        assert!(!queue.write("DEF"));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.extract(0).unwrap(), b"ABC");
    }

    #[test]
    fn test_read_is_non_destructive() {
        let mut queue = ByteQueue::new();
        queue.write("0123456789");
        assert_eq!(queue.read(4).unwrap(), b"0123");
        assert_eq!(queue.len(), 10);
        assert_eq!(queue.available_bytes(), 6);
        assert_eq!(queue.read(4).unwrap(), b"4567");
    }

    #[test]
    fn test_read_all_from_cursor() {
        let mut queue = ByteQueue::new();
        queue.write("0123456789");
        queue.read(5).unwrap();
        assert_eq!(queue.read(0).unwrap(), b"56789");
        // Cursor now at the tail: another read-all is an empty success.
        assert_eq!(queue.read(0).unwrap(), b"");
        assert_eq!(queue.available_bytes(), 0);
    }

    #[test]
    fn test_read_insufficient_data_fails_without_side_effects() {
        let mut queue = ByteQueue::new();
        queue.write("12");
        let err = queue.read(10).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientData("insufficient data to read".into())
        );
        assert_eq!(queue.available_bytes(), 2);
        assert_eq!(queue.read(2).unwrap(), b"12");
    }

    #[test]
    fn test_read_zero_on_empty_queue_is_empty_success() {
        let mut queue = ByteQueue::new();
        assert_eq!(queue.read(0).unwrap(), b"");
    }

    #[test]
    fn test_extract_removes_from_head() {
        let mut queue = ByteQueue::new();
        queue.write("ABCDEF");
        assert_eq!(queue.extract(2).unwrap(), b"AB");
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.extract(2).unwrap(), b"CD");
        assert_eq!(queue.extract(0).unwrap(), b"EF");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extract_zero_on_empty_queue_is_empty_success() {
        let mut queue = ByteQueue::new();
        assert_eq!(queue.extract(0).unwrap(), b"");
    }

    #[test]
    fn test_extract_insufficient_data_fails_without_side_effects() {
        let mut queue = ByteQueue::new();
        queue.write("AB");
        let err = queue.extract(3).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientData("insufficient data to extract".into())
        );
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_extract_adjusts_read_cursor() {
        let mut queue = ByteQueue::new();
        queue.write("ABCDEFGH");
        assert_eq!(queue.read(3).unwrap(), b"ABC");
        // Removing AB pulls the cursor back by 2; the next read starts at D.
        queue.extract(2).unwrap();
        assert_eq!(queue.read(2).unwrap(), b"DE");
    }

    #[test]
    fn test_extract_past_cursor_resets_cursor_to_head() {
        let mut queue = ByteQueue::new();
        queue.write("ABCDEFGH");
        queue.read(2).unwrap();
        // Extract more than the cursor offset: cursor clamps to the head.
        queue.extract(5).unwrap();
        assert_eq!(queue.read(0).unwrap(), b"FGH");
    }

    #[test]
    fn test_seek_absolute_and_relative() {
        let mut queue = ByteQueue::new();
        queue.write("0123456789");
        queue.seek(5, SeekOrigin::Absolute);
        assert_eq!(queue.read(3).unwrap(), b"567");
        queue.seek(-8, SeekOrigin::Relative);
        assert_eq!(queue.read(4).unwrap(), b"0123");
        queue.seek(2, SeekOrigin::Relative);
        assert_eq!(queue.read(0).unwrap(), b"6789");
    }

    #[test]
    fn test_seek_clamps_to_bounds() {
        let mut queue = ByteQueue::new();
        queue.write("abc");
        queue.seek(100, SeekOrigin::Absolute);
        assert_eq!(queue.available_bytes(), 0);
        queue.seek(-100, SeekOrigin::Relative);
        assert_eq!(queue.available_bytes(), 3);
    }

    #[test]
    fn test_seek_negative_absolute_is_noop() {
        let mut queue = ByteQueue::new();
        queue.write("abc");
        queue.seek(2, SeekOrigin::Absolute);
        queue.seek(-1, SeekOrigin::Absolute);
        assert_eq!(queue.read(0).unwrap(), b"c");
    }

    #[test]
    fn test_close_is_idempotent_and_monotonic() {
        let mut queue = ByteQueue::new();
        queue.write("X");
        queue.close();
        queue.close();
        assert!(queue.is_closed());
        assert!(!queue.is_writable());
        assert!(queue.is_readable());
        assert!(!queue.eof());
        queue.extract(0).unwrap();
        assert!(queue.eof());
    }

    #[test]
    fn test_error_state_rejects_reads_and_writes() {
        let mut queue = ByteQueue::new();
        queue.write("DATA");
        queue.set_error();
        queue.set_error();
        assert!(!queue.is_writable());
        assert!(!queue.is_readable());
        assert!(queue.eof());
        assert!(!queue.write("MORE"));
        let not_readable = Error::InsufficientData("buffer is not readable".into());
        assert_eq!(queue.read(1).unwrap_err(), not_readable);
        assert_eq!(queue.extract(0).unwrap_err(), not_readable);
    }

    #[test]
    fn test_clear_resets_content_but_not_flags() {
        let mut queue = ByteQueue::with_capacity(32);
        queue.write("some data");
        queue.read(4).unwrap();
        queue.close();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.available_bytes(), 0);
        assert!(queue.capacity() >= 32);
        assert!(queue.is_closed());
    }

    #[test]
    fn test_clean_drops_read_prefix() {
        let mut queue = ByteQueue::new();
        queue.write("ABCDEFGH");
        queue.read(3).unwrap();
        queue.clean();
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.read(0).unwrap(), b"DEFGH");
    }

    #[test]
    fn test_reserve_grows_allocation() {
        let mut queue = ByteQueue::new();
        queue.reserve(256);
        assert!(queue.capacity() >= 256);
        queue.write("abc");
        queue.reserve(8);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_concatenation_order_is_preserved() {
        let mut queue = ByteQueue::new();
        queue.write("first ");
        queue.write("second ");
        queue.write("third");
        assert_eq!(queue.extract(0).unwrap(), b"first second third");
    }

    #[test]
    fn test_cursor_never_exceeds_len() {
        let mut queue = ByteQueue::new();
        queue.write("0123456789");
        queue.read(0).unwrap();
        assert_eq!(queue.available_bytes(), 0);
        queue.extract(0).unwrap();
        // Cursor was at 10; the drain clamps it back to the (now empty) head.
        assert_eq!(queue.available_bytes(), 0);
        queue.write("ab");
        assert_eq!(queue.read(0).unwrap(), b"ab");
    }
}
