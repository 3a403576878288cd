//! Primary-context invocation queue.
//!
//! The layout engine treats one thread as its primary context: it owns the
//! live snapshots and is the only place layout parameters are read. Work that
//! runs elsewhere (the async layout worker) reaches back into that context
//! through this queue.
//!
//! # How It Works
//!
//! 1. The host creates a [`MainQueue`] on its primary thread and hands out
//!    [`MainHandle`]s.
//! 2. Other threads send closures through a handle, either fire-and-forget
//!    ([`MainHandle::post`]) or waiting for the result
//!    ([`MainHandle::invoke_blocking`]).
//! 3. The host's event loop drains the queue with
//!    [`MainQueue::process_pending`], running every invocation on the primary
//!    thread in FIFO order.
//!
//! # Example
//!
//! ```
//! use cascade_core::dispatch::MainQueue;
//!
//! let queue = MainQueue::new();
//! let handle = queue.handle();
//!
//! let worker = std::thread::spawn(move || {
//!     handle.post(|| println!("runs on the primary thread")).unwrap();
//! });
//! worker.join().unwrap();
//!
//! assert_eq!(queue.process_pending(), 1);
//! ```

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};

use crate::error::{CoreError, Result};
use crate::thread_check::ThreadAffinity;

/// A type-erased closure waiting to run on the primary context.
pub(crate) struct QueuedInvocation {
    invoke: Box<dyn FnOnce() + Send>,
}

impl QueuedInvocation {
    /// Wrap a closure for deferred execution.
    pub(crate) fn new<F>(invoke: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            invoke: Box::new(invoke),
        }
    }

    /// Execute the invocation.
    pub(crate) fn execute(self) {
        (self.invoke)();
    }
}

/// The receiving end of the primary-context queue.
///
/// Owned by the primary thread. Dropping it closes the queue: pending
/// invocations are discarded and blocked callers are released with
/// [`CoreError::MainQueueClosed`].
pub struct MainQueue {
    receiver: Receiver<QueuedInvocation>,
    handle: MainHandle,
}

impl MainQueue {
    /// Create a queue bound to the current thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            receiver,
            handle: MainHandle {
                sender,
                affinity: ThreadAffinity::current(),
            },
        }
    }

    /// Get a sendable handle for posting work to this queue.
    pub fn handle(&self) -> MainHandle {
        self.handle.clone()
    }

    /// The affinity of the primary thread.
    #[inline]
    pub fn affinity(&self) -> ThreadAffinity {
        self.handle.affinity
    }

    /// Number of invocations waiting to run.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Run every invocation currently queued.
    ///
    /// Invocations posted while draining are picked up in the same call.
    /// Returns the number executed.
    pub fn process_pending(&self) -> usize {
        self.handle.affinity.debug_assert_same_thread("MainQueue::process_pending");

        let mut executed = 0;
        while let Ok(invocation) = self.receiver.try_recv() {
            invocation.execute();
            executed += 1;
        }
        if executed > 0 {
            tracing::trace!(target: "cascade_core::dispatch", executed, "processed queued invocations");
        }
        executed
    }

    /// Wait up to `timeout` for at least one invocation, then drain the queue.
    ///
    /// Returns the number executed (zero if the timeout elapsed).
    pub fn wait_and_process(&self, timeout: Duration) -> usize {
        self.handle.affinity.debug_assert_same_thread("MainQueue::wait_and_process");

        match self.receiver.recv_timeout(timeout) {
            Ok(invocation) => {
                invocation.execute();
                1 + self.process_pending()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MainQueue {
    fn drop(&mut self) {
        let mut discarded = 0usize;
        while let Ok(invocation) = self.receiver.try_recv() {
            drop(invocation);
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(target: "cascade_core::dispatch", discarded, "main queue closed with pending invocations");
        }
    }
}

/// A cloneable, sendable handle to a [`MainQueue`].
#[derive(Clone)]
pub struct MainHandle {
    sender: Sender<QueuedInvocation>,
    affinity: ThreadAffinity,
}

impl std::fmt::Debug for MainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainHandle")
            .field("affinity", &self.affinity)
            .finish_non_exhaustive()
    }
}

impl MainHandle {
    /// Whether the calling thread is the primary thread.
    #[inline]
    pub fn is_primary(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// The affinity of the primary thread.
    #[inline]
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Queue a closure to run on the primary thread without waiting.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(QueuedInvocation::new(f))
            .map_err(|_| CoreError::MainQueueClosed)
    }

    /// Run a closure on the primary thread and wait for its result.
    ///
    /// Called from the primary thread itself, the closure runs inline so the
    /// caller cannot deadlock on its own queue.
    ///
    /// # Warning
    ///
    /// From any other thread this blocks until the primary thread drains the
    /// queue. The host must keep calling [`MainQueue::process_pending`].
    pub fn invoke_blocking<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_primary() {
            return Ok(f());
        }

        let (result_sender, result_receiver) = bounded(1);
        self.post(move || {
            let _ = result_sender.send(f());
        })?;

        // A dropped invocation drops its sender, which ends the wait.
        result_receiver.recv().map_err(|_| CoreError::MainQueueClosed)
    }
}

static_assertions::assert_impl_all!(MainHandle: Send, Sync, Clone);
