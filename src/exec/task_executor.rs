// src/exec/task_executor.rs

//! Runs a single task under the device state machine.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::device::{DeviceStateMachine, RunId, TickOutcome};
use crate::errors::Result;
use crate::exec::ticker::TickSource;
use crate::model::Task;

/// Drives the tick loop of one task at a time.
///
/// Each tick the executor suspends once (on the [`TickSource`]), then commits
/// the tick to the state machine, which decides whether elapsed time advances
/// (`Running`), stands still (`Paused`) or the run was cancelled (emergency
/// stop). There is no separate cancellation token.
#[derive(Clone)]
pub struct TaskExecutor {
    machine: DeviceStateMachine,
    ticks: Arc<dyn TickSource>,
}

impl fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

impl TaskExecutor {
    pub fn new(machine: DeviceStateMachine, ticks: Arc<dyn TickSource>) -> Self {
        Self { machine, ticks }
    }

    pub(crate) fn machine(&self) -> &DeviceStateMachine {
        &self.machine
    }

    /// Run `task` to completion.
    ///
    /// - `Err(DeviceNotPowered)` / `Err(InvalidOperation)` if the task cannot
    ///   start; the device state is left untouched.
    /// - `Ok(true)` once the task ran for its full duration.
    /// - `Ok(false)` if the run was aborted by an emergency stop.
    pub async fn execute(&self, task: Task) -> Result<bool> {
        self.run(task, None).await
    }

    pub(crate) async fn run(&self, task: Task, recipe: Option<RunId>) -> Result<bool> {
        let task = Arc::new(task);
        let run = self.machine.begin_task(Arc::clone(&task), recipe)?;
        let _release = TaskRunGuard {
            machine: &self.machine,
            run,
        };

        let mut ticker = self.ticks.ticker();
        let mut elapsed = Duration::ZERO;
        let mut suspended_ticks: u64 = 0;

        loop {
            let dt = ticker.tick().await;

            match self.machine.commit_tick(run, dt, &mut elapsed) {
                TickOutcome::Advanced(_) => {}
                TickOutcome::Suspended => {
                    suspended_ticks += 1;
                }
                TickOutcome::Completed => {
                    debug!(
                        task = %task.name(),
                        suspended_ticks,
                        "task run finished"
                    );
                    return Ok(true);
                }
                TickOutcome::Aborted => {
                    info!(
                        task = %task.name(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "task run aborted"
                    );
                    return Ok(false);
                }
            }
        }
    }
}

/// Hands the device back if the run future is dropped mid-task.
struct TaskRunGuard<'a> {
    machine: &'a DeviceStateMachine,
    run: RunId,
}

impl Drop for TaskRunGuard<'_> {
    fn drop(&mut self) {
        self.machine.abandon_task(self.run);
    }
}
