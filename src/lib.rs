//! # Pipeflow
//!
//! An in-process streaming byte FIFO with blocking reads and a multi-stage
//! processing pipeline on top of it.
//!
//! Pipeflow moves opaque byte streams between cooperating producers and
//! consumers in the same process: compression chains, encoders, filters,
//! scanners, anywhere one or more producing threads feed a chain of
//! transformation stages that deliver bytes to consumers.
//!
//! ## Layers
//!
//! - [`queue::ByteQueue`]: unsynchronized byte FIFO with a non-destructive
//!   read cursor and terminal close/error flags
//! - [`shared::SharedByteQueue`]: thread-safe wrapper adding blocking
//!   read/extract on a condition variable
//! - [`handle::WriteHandle`] / [`handle::ReadHandle`]: cheap write-only and
//!   read-only views sharing one queue
//! - [`pipeline::Pipeline`]: chains transformation stages over intermediate
//!   queues, sequentially or on worker threads
//!
//! ## Quick start
//!
//! ```
//! use pipeflow::prelude::*;
//! use tracing::Span;
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.add_stage(|input, output, _span| {
//!     loop {
//!         let chunk = input.extract(1024).unwrap_or_default();
//!         if chunk.is_empty() {
//!             break;
//!         }
//!         let upper: Vec<u8> = chunk.iter().map(|b| b.to_ascii_uppercase()).collect();
//!         output.write(upper);
//!     }
//!     output.close();
//! });
//!
//! let input = WriteHandle::new();
//! input.write("hello world");
//! input.close();
//!
//! let result = pipeline.process(input.reader(), ExecutionMode::Concurrent, Span::none());
//! assert_eq!(result.extract(11).unwrap(), b"HELLO WORLD");
//! pipeline.wait_for_completion();
//! ```
//!
//! ## Stream termination
//!
//! Producers announce graceful end-of-stream with `close`: consumers drain
//! what is buffered and then observe [`eof`](handle::ReadHandle::eof). Any
//! participant can instead raise the error state with `set_error`: blocked
//! readers wake up with [`Error::InsufficientData`] immediately, buffered
//! bytes and all. [`pipeline::Pipeline::set_error`] cascades the error state
//! to every intermediate queue for cooperative cancellation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod handle;
pub mod pipeline;
pub mod queue;
pub mod shared;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::handle::{ReadHandle, WriteHandle};
    pub use crate::pipeline::{ExecutionMode, Pipeline, Stage};
    pub use crate::queue::{ByteQueue, SeekOrigin};
    pub use crate::shared::SharedByteQueue;
}

pub use error::{Error, Result};
