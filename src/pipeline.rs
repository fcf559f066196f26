//! Multi-stage processing pipeline over shared byte queues.
//!
//! A [`Pipeline`] chains user-supplied transformation stages with
//! intermediate [`SharedByteQueue`](crate::shared::SharedByteQueue)s: each
//! stage reads from the previous stage's queue and writes into its own.
//! Stages run on worker threads (or partially inline, see
//! [`ExecutionMode`]), synchronize purely through the blocking queue
//! operations, and signal completion by closing their output.

use crate::handle::{ReadHandle, WriteHandle};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::Span;

/// How pipeline stages are scheduled by [`Pipeline::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// The final stage runs inline in the calling thread and all worker
    /// threads are joined before `process` returns. Deterministic: when the
    /// call returns, the returned reader holds the complete output.
    Sequential,
    /// Every stage runs on its own worker thread and `process` returns
    /// immediately; output becomes available in the returned reader as the
    /// stages make progress.
    Concurrent,
}

/// Type-erased pipeline stage.
///
/// A stage drains its input until [`eof`](ReadHandle::eof), writes
/// transformed bytes to its output, and must close (or error) the output
/// before returning; otherwise downstream consumers block forever. A
/// well-behaved stage also polls [`is_writable`](WriteHandle::is_writable)
/// on its output inside long-running loops and bails out once it turns
/// false; that is how [`Pipeline::set_error`] cancellation reaches it.
///
/// The [`Span`] argument is a logging capability handed through from
/// [`Pipeline::process`]; the pipeline itself does nothing with it. Stages
/// that do not log can ignore it, callers that do not log pass
/// [`Span::none`].
pub type Stage = Arc<dyn Fn(ReadHandle, WriteHandle, Span) + Send + Sync + 'static>;

/// A sequence of transformation stages wired by shared byte queues.
///
/// # Example
///
/// ```
/// use pipeflow::handle::WriteHandle;
/// use pipeflow::pipeline::{ExecutionMode, Pipeline};
/// use tracing::Span;
///
/// let mut pipeline = Pipeline::new();
/// pipeline.add_stage(|input, output, _span| {
///     loop {
///         let chunk = input.extract(1024).unwrap_or_default();
///         if chunk.is_empty() {
///             break;
///         }
///         let upper: Vec<u8> = chunk.iter().map(|b| b.to_ascii_uppercase()).collect();
///         output.write(upper);
///     }
///     output.close();
/// });
///
/// let input = WriteHandle::new();
/// input.write("hello");
/// input.close();
///
/// let result = pipeline.process(input.reader(), ExecutionMode::Sequential, Span::none());
/// assert_eq!(result.extract(0).unwrap(), b"HELLO");
/// ```
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
    outputs: Vec<WriteHandle>,
    workers: Vec<JoinHandle<()>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage. Stages run in the order they were added.
    pub fn add_stage<F>(&mut self, stage: F)
    where
        F: Fn(ReadHandle, WriteHandle, Span) + Send + Sync + 'static,
    {
        self.stages.push(Arc::new(stage));
    }

    /// Number of stages currently in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run the pipeline over `input` and return the final stage's reader.
    ///
    /// Wiring: stage 0 reads from `input`; stage i reads from stage i−1's
    /// output queue; the returned [`ReadHandle`] is the peer of the last
    /// stage's output. With no stages at all, the input queue itself is
    /// closed and handed back, so consumers of the returned handle never
    /// block on a stream nothing will feed.
    ///
    /// `span` is passed to every stage and entered by every worker thread;
    /// use [`Span::none`] when no logging context is wanted.
    ///
    /// Calling `process` again while a previous run is still executing is
    /// not supported; this method first joins any workers left from the
    /// prior run, so the call blocks until that run has finished.
    pub fn process(&mut self, input: ReadHandle, mode: ExecutionMode, span: Span) -> ReadHandle {
        // Guards double calls; harmless on the first one.
        self.wait_for_completion();

        if self.stages.is_empty() {
            let passthrough = WriteHandle::from_reader(&input);
            passthrough.close();
            return passthrough.reader();
        }

        self.outputs = (0..self.stages.len()).map(|_| WriteHandle::new()).collect();

        let last = self.stages.len() - 1;
        for (index, stage) in self.stages.iter().enumerate() {
            let stage_in = if index == 0 {
                input.clone()
            } else {
                self.outputs[index - 1].reader()
            };
            let stage_out = self.outputs[index].clone();

            if index < last || mode == ExecutionMode::Concurrent {
                let stage = Arc::clone(stage);
                let span = span.clone();
                self.workers.push(thread::spawn(move || {
                    let _guard = span.clone().entered();
                    tracing::debug!(stage = index, "stage worker started");
                    stage(stage_in, stage_out, span);
                    tracing::debug!(stage = index, "stage worker finished");
                }));
            } else {
                // Sequential tail runs inline so completion is deterministic.
                let _guard = span.clone().entered();
                tracing::debug!(stage = index, "stage running inline");
                stage(stage_in, stage_out, span.clone());
            }
        }

        if mode == ExecutionMode::Sequential {
            self.wait_for_completion();
        }

        self.outputs[last].reader()
    }

    /// Put every intermediate output queue of the current run in the error
    /// state.
    ///
    /// Stages blocked reading an intermediate queue wake up and fail; stages
    /// polling their output's writability observe the cancellation and bail
    /// out. The caller's input queue is not touched. Call
    /// [`wait_for_completion`](Self::wait_for_completion) afterwards to join
    /// the workers.
    pub fn set_error(&self) {
        for output in &self.outputs {
            output.set_error();
        }
    }

    /// Join all worker threads from the current run. Idempotent.
    ///
    /// A worker that panicked (a stage contract violation) is logged and
    /// otherwise ignored; the remaining workers are still joined.
    pub fn wait_for_completion(&mut self) {
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("pipeline stage worker panicked");
            }
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.wait_for_completion();
    }
}
