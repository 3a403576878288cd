//! Dedicated background thread for off-primary layout work.
//!
//! A `Worker` owns one thread and a bounded FIFO job queue. Jobs run
//! sequentially, each to completion; there is no cancellation of a job once it
//! has started. A job that panics is logged and skipped; the thread keeps
//! serving the queue. Results travel back to the primary context through a
//! [`MainHandle`](crate::dispatch::MainHandle) captured by the job itself.
//!
//! # Example
//!
//! ```no_run
//! use cascade_core::dispatch::MainQueue;
//! use cascade_core::worker::Worker;
//!
//! let queue = MainQueue::new();
//! let worker = Worker::spawn_default().unwrap();
//!
//! let main = queue.handle();
//! worker
//!     .submit(move || {
//!         let answer = 6 * 7;
//!         let _ = main.post(move || println!("computed {answer}"));
//!     })
//!     .unwrap();
//!
//! queue.wait_and_process(std::time::Duration::from_secs(1));
//! worker.stop_and_join();
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select};
use parking_lot::Mutex;

use crate::error::{CoreError, Result};

/// Default capacity of the job queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default worker thread name.
pub const DEFAULT_WORKER_NAME: &str = "cascade-layout";

/// How to spawn a [`Worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Thread name, visible in debuggers and panic messages.
    pub name: String,
    /// Stack size in bytes; `None` keeps the platform default.
    pub stack_size: Option<usize>,
    /// Jobs that may wait in the queue before `submit` reports it full.
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORKER_NAME.to_string(),
            stack_size: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl WorkerConfig {
    /// Default configuration with a custom thread name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Set the queue capacity; zero is raised to one.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}

type Job = Box<dyn FnOnce() + Send>;

/// Counters shared with the worker thread.
#[derive(Debug)]
struct Shared {
    accepting: AtomicBool,
    /// Jobs queued or running.
    outstanding: AtomicUsize,
}

/// A dedicated background thread with a FIFO job queue.
pub struct Worker {
    jobs: Sender<Job>,
    shutdown: Sender<()>,
    thread: Mutex<Option<JoinHandle<()>>>,
    shared: Arc<Shared>,
    config: WorkerConfig,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.config.name)
            .field("running", &self.is_running())
            .field("pending_jobs", &self.pending_jobs())
            .finish()
    }
}

impl Worker {
    /// Spawn a worker with [`WorkerConfig::default`].
    pub fn spawn_default() -> Result<Self> {
        Self::spawn(WorkerConfig::default())
    }

    pub fn spawn(config: WorkerConfig) -> Result<Self> {
        let config = WorkerConfig {
            queue_capacity: config.queue_capacity.max(1),
            ..config
        };
        let (jobs, job_receiver) = bounded(config.queue_capacity);
        let (shutdown, shutdown_receiver) = bounded(1);
        let shared = Arc::new(Shared {
            accepting: AtomicBool::new(true),
            outstanding: AtomicUsize::new(0),
        });

        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let thread_shared = Arc::clone(&shared);
        let thread = builder
            .spawn(move || run(&job_receiver, &shutdown_receiver, &thread_shared))
            .map_err(|source| CoreError::spawn_failed(config.name.clone(), source))?;

        tracing::debug!(
            target: "cascade_core::worker",
            name = %config.name,
            capacity = config.queue_capacity,
            "worker started"
        );

        Ok(Self {
            jobs,
            shutdown,
            thread: Mutex::new(Some(thread)),
            shared,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Whether the worker still accepts jobs.
    pub fn is_running(&self) -> bool {
        self.shared.accepting.load(Ordering::Acquire)
    }

    /// Jobs queued or running.
    pub fn pending_jobs(&self) -> usize {
        self.shared.outstanding.load(Ordering::Acquire)
    }

    /// Queue a job. Never blocks.
    pub fn submit<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.is_running() {
            return Err(CoreError::WorkerStopped);
        }

        self.shared.outstanding.fetch_add(1, Ordering::AcqRel);
        let rejected = match self.jobs.try_send(Box::new(job)) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(_)) => CoreError::QueueFull {
                capacity: self.config.queue_capacity,
            },
            Err(TrySendError::Disconnected(_)) => CoreError::WorkerStopped,
        };
        self.shared.outstanding.fetch_sub(1, Ordering::AcqRel);
        Err(rejected)
    }

    /// Stop accepting jobs; the thread exits once the queue is drained.
    ///
    /// Never blocks.
    pub fn stop(&self) {
        if self.shared.accepting.swap(false, Ordering::AcqRel) {
            let _ = self.shutdown.try_send(());
        }
    }

    /// Wait for the thread to exit.
    ///
    /// Returns `false` if it was already joined.
    pub fn join(&self) -> bool {
        match self.thread.lock().take() {
            Some(thread) => thread.join().is_ok(),
            None => false,
        }
    }

    pub fn stop_and_join(&self) -> bool {
        self.stop();
        self.join()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

static_assertions::assert_impl_all!(Worker: Send, Sync);

fn run(jobs: &Receiver<Job>, shutdown: &Receiver<()>, shared: &Shared) {
    let execute = |job: Job| {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!(
                target: "cascade_core::worker",
                panic = panic_message(payload.as_ref()),
                "worker job panicked"
            );
        }
        shared.outstanding.fetch_sub(1, Ordering::AcqRel);
    };

    loop {
        select! {
            recv(jobs) -> job => match job {
                Ok(job) => execute(job),
                Err(_) => break,
            },
            recv(shutdown) -> _ => {
                // Jobs accepted before the stop still run.
                while let Ok(job) = jobs.try_recv() {
                    execute(job);
                }
                break;
            }
        }
    }

    shared.accepting.store(false, Ordering::Release);
    tracing::debug!(target: "cascade_core::worker", "worker exited");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
