//! Plan executor module.
//!
//! Copies every planned file to its tagged destination on a bounded pool of
//! blocking workers. Items are independent and may finish in any order.
//!
//! When a copy fails no further items are dispatched, but copies already in
//! flight are allowed to finish before the first failure is returned.

use crate::core::context::Context;
use crate::models::plan::{Plan, PlanItem};
use crate::utils::fs::copy_with_metadata;
use crate::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;

/// Hard upper bound on concurrent copies.
pub const MAX_THREADS: usize = 256;

/// Number of workers to run for `items` items when `threads` were requested.
pub fn worker_count(threads: usize, items: usize) -> usize {
    threads.clamp(1, MAX_THREADS).min(items.max(1))
}

/// Plan executor.
pub struct Executor<'a> {
    context: &'a Context,
}

impl<'a> Executor<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }

    /// Execute every item of `plan`, returning the first copy failure.
    pub async fn execute(&self, plan: &Plan) -> Result<()> {
        self.run(plan)
            .with_subscriber(self.context.dispatch().clone())
            .await
    }

    async fn run(&self, plan: &Plan) -> Result<()> {
        let total = plan.len();
        let workers = worker_count(self.context.threads, total);
        tracing::debug!("Executing {} plan items with {} workers", total, workers);

        let pb = if self.context.verbose {
            None
        } else {
            Some(progress_bar(total))
        };

        let mut pending = plan.iter();
        let mut in_flight: FuturesUnordered<JoinHandle<Result<()>>> = FuturesUnordered::new();
        let mut first_error: Option<crate::Error> = None;
        let mut done = 0usize;
        let mut failed = 0usize;

        for item in pending.by_ref().take(workers) {
            in_flight.push(self.spawn(item));
        }

        while let Some(joined) = in_flight.next().await {
            let result = joined
                .unwrap_or_else(|e| Err(crate::Error::other(format!("Copy task failed: {}", e))));

            match result {
                Ok(()) => {
                    done += 1;
                    if let Some(pb) = &pb {
                        pb.inc(1);
                    }
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("{}", e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }

            if first_error.is_none() {
                if let Some(item) = pending.next() {
                    in_flight.push(self.spawn(item));
                }
            }
        }

        if let Some(e) = first_error {
            if let Some(pb) = &pb {
                pb.abandon();
            }
            tracing::debug!(
                "Stopped after {} of {} items ({} copied, {} failed)",
                done + failed,
                total,
                done,
                failed
            );
            return Err(e);
        }

        if let Some(pb) = &pb {
            pb.finish();
        }
        tracing::info!("All done.");
        Ok(())
    }

    fn spawn(&self, item: &PlanItem) -> JoinHandle<Result<()>> {
        let item = item.clone();
        let dispatch = self.context.dispatch().clone();
        let verbose = self.context.verbose;
        let delay = self.context.item_delay;

        tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                execute_plan_item(&item, verbose, delay)
            })
        })
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("Executing [{bar:40.cyan/blue}] {pos}/{len} {percent}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}

/// Copy one item. Runs on a blocking worker thread.
fn execute_plan_item(item: &PlanItem, verbose: bool, delay: Option<Duration>) -> Result<()> {
    if verbose {
        tracing::debug!("Executing plan item: {}", item);
    }

    if let Some(delay) = delay {
        std::thread::sleep(delay);
    }

    copy_with_metadata(&item.src, &item.dest).map_err(|source| crate::Error::Copy {
        src: item.src.clone(),
        dest: item.dest.clone(),
        source,
    })?;

    if verbose {
        if item.overwrite_flag {
            tracing::info!("Overwrote: {}", item.dest.display());
        } else {
            tracing::info!("Created: {}", item.dest.display());
        }
    }

    Ok(())
}

/// Execute a plan (convenience function).
pub async fn execute_plan(plan: &Plan, context: &Context) -> Result<()> {
    Executor::new(context).execute(plan).await
}
