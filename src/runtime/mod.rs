//! Tokio runtime construction for the binary.

use tokio::runtime::{Builder, Runtime};

/// Build a multi-threaded runtime, defaulting to one worker per CPU.
pub fn build_runtime(worker_threads: Option<usize>) -> Result<Runtime, std::io::Error> {
    let worker_threads = worker_threads.unwrap_or_else(num_cpus::get).max(1);
    tracing::debug!(worker_threads, "building tokio runtime");
    Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .thread_name("fill-station-worker")
        .enable_all()
        .build()
}
