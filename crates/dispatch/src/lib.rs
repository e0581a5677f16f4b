//! # Dispatch — Fixed-Point Work Engine
//!
//! A single-coordinator / N-worker engine for workloads where **items
//! generate new items**: decoding one asset surfaces references to more
//! assets, which must be decoded in turn, until the frontier drains. A plain
//! worker pool cannot express this — the pool would shut down while
//! discoveries are still arriving.
//!
//! ```text
//!            to_worker                 from_worker
//! coordinator ---------> worker x N -------------> coordinator
//!     |                    work()                      |
//!     +--- dispatch(): expand outputs into new items --+
//! ```
//!
//! ## Protocol
//!
//! 1. Seed items go to `to_worker`; `pending` starts at the seed count.
//! 2. The coordinator receives a finished item. Errored items are recorded
//!    and never expanded. Otherwise `dispatch` turns the item's output into
//!    new items, each bumping `pending` and entering `to_worker`.
//! 3. `pending` drops by one per received item; at zero the coordinator
//!    drops its sender, workers drain naturally, and the scope joins.
//! 4. Every item error (including `dispatch` failures) aggregates into
//!    [`AggregateError`]; nothing fails fast.
//!
//! `dispatch` runs only on the coordinator thread, so it may own mutable
//! state (a seen-set, accumulators) without locking. `work` runs on worker
//! threads under a panic umbrella: a panicking worker records an error on
//! its item instead of wedging the run.
//!
//! Both channels are unbounded, so no send can block and the coordinator
//! can never deadlock against a worker mid-send.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::unbounded;

/// A unit of work owned by the engine.
///
/// Created by the caller (seeds) or by `dispatch` (discoveries); carries its
/// result or error back to the coordinator when a worker finishes with it.
#[derive(Debug)]
pub struct Item<D, O> {
    /// Caller-defined payload describing the work.
    pub data: D,
    /// Output of a successful `work` call.
    pub output: Option<O>,
    /// Error from `work`, a worker panic, or `dispatch`.
    pub error: Option<anyhow::Error>,
}

impl<D, O> Item<D, O> {
    /// Creates a pending item around `data`.
    pub fn new(data: D) -> Self {
        Self {
            data,
            output: None,
            error: None,
        }
    }
}

/// Every item error collected by a finished run.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<anyhow::Error>,
}

impl std::error::Error for AggregateError {}

impl AggregateError {
    /// The individual item errors, in completion order.
    #[must_use]
    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} error(s) occurred:", self.errors.len())?;
        for e in &self.errors {
            writeln!(f, "  * {e:#}")?;
        }
        Ok(())
    }
}

/// Runs the engine to its fixed point.
///
/// * `work` — applied to each item on a worker thread; blocking I/O is fine.
/// * `dispatch` — applied to each finished item on the coordinator thread;
///   returns the new items its output generates. It owns all
///   single-threaded state.
/// * `seed` — initial frontier. An empty seed returns `Ok(())` immediately.
/// * `concurrency` — worker count; clamped to at least 1.
///
/// Returns `Err(AggregateError)` if any item errored; the run still
/// completes every item first.
pub fn run<D, O, W, F>(
    mut dispatch: F,
    work: W,
    seed: Vec<Item<D, O>>,
    concurrency: usize,
) -> Result<(), AggregateError>
where
    D: Send,
    O: Send,
    W: Fn(&D) -> anyhow::Result<O> + Sync,
    F: FnMut(&Item<D, O>) -> anyhow::Result<Vec<Item<D, O>>>,
{
    if seed.is_empty() {
        return Ok(());
    }
    let concurrency = concurrency.max(1);

    let (work_tx, work_rx) = unbounded::<Item<D, O>>();
    let (done_tx, done_rx) = unbounded::<Item<D, O>>();

    let mut pending = seed.len();
    for item in seed {
        // Unbounded channel: send cannot fail while work_rx lives below.
        let _ = work_tx.send(item);
    }

    let mut finished: Vec<Item<D, O>> = Vec::new();

    thread::scope(|scope| {
        for _ in 0..concurrency {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            let work = &work;
            scope.spawn(move || {
                for mut item in work_rx.iter() {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| work(&item.data)));
                    match result {
                        Ok(Ok(output)) => item.output = Some(output),
                        Ok(Err(e)) => item.error = Some(e),
                        Err(payload) => item.error = Some(panic_to_error(payload)),
                    }
                    if done_tx.send(item).is_err() {
                        break;
                    }
                }
            });
        }
        // The coordinator keeps no sender of its own on the done channel.
        drop(done_tx);
        drop(work_rx);

        while pending > 0 {
            let Ok(mut item) = done_rx.recv() else {
                // All workers gone with work outstanding; nothing left to
                // receive. Cannot happen while the scope holds the workers.
                break;
            };
            pending -= 1;

            if item.error.is_none() {
                match dispatch(&item) {
                    Ok(new_items) => {
                        pending += new_items.len();
                        for new_item in new_items {
                            let _ = work_tx.send(new_item);
                        }
                    }
                    Err(e) => item.error = Some(e),
                }
            }
            finished.push(item);
        }

        // Closing the work channel lets workers drain and exit; the scope
        // joins them before returning.
        drop(work_tx);
    });

    let errors: Vec<anyhow::Error> = finished.into_iter().filter_map(|i| i.error).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AggregateError { errors })
    }
}

fn panic_to_error(payload: Box<dyn std::any::Any + Send>) -> anyhow::Error {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string());
    anyhow::anyhow!("worker panicked: {msg}")
}

#[cfg(test)]
mod tests;
