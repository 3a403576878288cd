//! Error types for Cascade's threading plumbing.

/// Errors raised by the dispatch queue and the background worker.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The worker thread could not be spawned.
    #[error("Failed to spawn worker thread '{name}': {source}")]
    SpawnFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The worker has been stopped and no longer accepts jobs.
    #[error("Worker has been stopped")]
    WorkerStopped,

    /// The worker's job queue is at capacity.
    #[error("Worker queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// The primary-context queue was dropped before the invocation ran.
    #[error("Main queue has been closed")]
    MainQueueClosed,
}

impl CoreError {
    /// Create a spawn error.
    pub fn spawn_failed(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            name: name.into(),
            source,
        }
    }
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
