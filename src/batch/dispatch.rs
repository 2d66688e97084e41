//! Bounded-concurrency dispatch.

use crate::{Error, ErrorContext, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::thread;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Number of worker threads; must be at least 1
    pub concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: crate::config::DEFAULT_CONCURRENCY,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }
}

/// Fixed pool of workers pulling from a shared cursor.
///
/// Each worker claims the next unprocessed index with an atomic increment,
/// runs the job, and stores the result in the slot of the same index. No
/// index is claimed twice and every slot is written exactly once, so the
/// output has the same length and order as the input.
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(concurrency: usize) -> Self {
        Self::with_config(DispatchConfig::new().with_concurrency(concurrency))
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run `job` once per item and return the results in input order.
    ///
    /// Exactly `concurrency` workers are started even when there are fewer
    /// items; the surplus exit without work. Returns once every worker has
    /// exited. A panicking job is a run-level failure.
    pub fn run<T, R, F>(&self, items: &[T], job: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send + Sync,
        F: Fn(&T) -> R + Sync,
    {
        let workers = self.config.concurrency;
        if workers == 0 {
            return Err(Error::configuration_with_context(
                "concurrency must be at least 1",
                ErrorContext::new()
                    .with_field_path("concurrent_requests")
                    .with_source("dispatch"),
            ));
        }

        let cursor = AtomicUsize::new(0);
        let slots: Vec<OnceLock<R>> = (0..items.len()).map(|_| OnceLock::new()).collect();

        let worker_loop = |id: usize| -> usize {
            debug!(worker = id, "worker started");
            let mut handled = 0usize;
            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(item) = items.get(index) else {
                    break;
                };
                debug!(worker = id, index, "dispatching request");
                // The cursor hands out each index once, so the slot is empty.
                let _ = slots[index].set(job(item));
                handled += 1;
            }
            debug!(worker = id, handled, "worker exited");
            handled
        };

        let panicked = thread::scope(|scope| -> Result<usize> {
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let worker = &worker_loop;
                let handle = thread::Builder::new()
                    .name(format!("bench-worker-{}", id))
                    .spawn_scoped(scope, move || worker(id))
                    .map_err(|e| {
                        Error::runtime_with_context(
                            format!("failed to spawn worker {}", id),
                            ErrorContext::new()
                                .with_details(e.to_string())
                                .with_source("dispatch"),
                        )
                    })?;
                handles.push(handle);
            }

            let mut panicked = 0;
            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    error!(worker = id, "worker panicked");
                    panicked += 1;
                }
            }
            Ok(panicked)
        })?;

        if panicked > 0 {
            return Err(Error::runtime_with_context(
                format!("{} worker(s) panicked during dispatch", panicked),
                ErrorContext::new().with_source("dispatch"),
            ));
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.into_inner().ok_or_else(|| {
                    Error::runtime_with_context(
                        "result slot left unfilled",
                        ErrorContext::new()
                            .with_field_path(format!("index {}", index))
                            .with_source("dispatch"),
                    )
                })
            })
            .collect()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_config(DispatchConfig::default())
    }
}

/// Shorthand for `Dispatcher::new(concurrency).run(items, job)`.
pub fn run<T, R, F>(items: &[T], concurrency: usize, job: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send + Sync,
    F: Fn(&T) -> R + Sync,
{
    Dispatcher::new(concurrency).run(items, job)
}
