//! Core threading plumbing for Cascade.
//!
//! This crate provides the pieces the layout engine needs to run work off its
//! primary context and bring the results back safely:
//!
//! - **Dispatch**: [`MainQueue`] / [`MainHandle`], a FIFO of closures drained
//!   by the primary thread, with fire-and-forget and blocking hops
//! - **Worker**: [`Worker`], a dedicated background thread with a bounded job
//!   queue
//! - **Thread checks**: [`ThreadAffinity`] for primary-only state
//! - **Logging**: tracing targets and [`PerfSpan`]
//!
//! # Example
//!
//! ```
//! use cascade_core::{MainQueue, Worker};
//! use std::time::Duration;
//!
//! let queue = MainQueue::new();
//! let worker = Worker::spawn_default().unwrap();
//!
//! let main = queue.handle();
//! worker
//!     .submit(move || {
//!         // Read primary-owned state with a synchronous hop...
//!         let width = main.invoke_blocking(|| 320.0_f32).unwrap();
//!         // ...and publish the result back asynchronously.
//!         let _ = main.post(move || assert_eq!(width, 320.0));
//!     })
//!     .unwrap();
//!
//! // The primary thread keeps pumping its queue.
//! let mut served = 0;
//! while served < 2 {
//!     served += queue.wait_and_process(Duration::from_millis(50));
//! }
//! worker.stop_and_join();
//! ```

pub mod dispatch;
mod error;
pub mod logging;
pub mod thread_check;
pub mod worker;

pub use dispatch::{MainHandle, MainQueue};
pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use thread_check::ThreadAffinity;
pub use worker::{Worker, WorkerConfig};
