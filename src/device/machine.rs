// src/device/machine.rs

//! The device state machine.
//!
//! [`DeviceStateMachine`] is a cheap, cloneable handle around the single
//! mutable [`DeviceState`] of one robot. Every public transition and every
//! executor tick takes the state lock exactly once, so commits are serialized.
//! Observer notifications are collected while the lock is held and dispatched
//! after it has been released.
//!
//! In-flight work is identified by [`RunId`]s. Starting a task or a recipe
//! issues a fresh id; emergency stop forgets the current ids, which is how a
//! sleeping executor learns at its next tick that its run was cancelled.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::device::lifecycle::{Command, Lifecycle};
use crate::device::observer::{lock, Notification, Observers, SubscriptionId};
use crate::device::state::{DeviceState, Readouts, StepChange};
use crate::errors::{KitchenError, Result};
use crate::model::progress::{interpolate, progress_percent};
use crate::model::{Recipe, Task};
use crate::types::Mode;

/// Identifier of one task or recipe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

/// Result of committing one executor tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Elapsed time advanced; carries the new progress percentage.
    Advanced(u8),
    /// The device is paused; elapsed time did not advance.
    Suspended,
    /// The task reached its duration and the device is back to `On`.
    Completed,
    /// The run was cancelled (emergency stop).
    Aborted,
}

struct Inner {
    state: DeviceState,
    next_run: u64,
    task_run: Option<RunId>,
    recipe_run: Option<RunId>,
}

impl Inner {
    fn issue_run(&mut self) -> RunId {
        self.next_run += 1;
        RunId(self.next_run)
    }

    fn apply(&mut self, command: Command, out: &mut Vec<Notification>) -> bool {
        match self.state.lifecycle.transition(command) {
            Some(next) => {
                if next != self.state.lifecycle {
                    info!(from = %self.state.lifecycle, to = %next, ?command, "lifecycle transition");
                    self.state.lifecycle = next;
                    out.push(Notification::State(next));
                }
                true
            }
            None => false,
        }
    }

    fn set_readouts(&mut self, readouts: Readouts, out: &mut Vec<Notification>) {
        if self.state.readouts != readouts {
            self.state.readouts = readouts;
            out.push(Notification::Parameters(readouts));
        }
    }

    fn reset_readouts(&mut self, out: &mut Vec<Notification>) {
        let baseline = self.state.baseline();
        self.set_readouts(baseline, out);
    }

    fn recipe_in_progress(&self) -> bool {
        self.recipe_run.is_some()
    }

    fn check_recipe_start(&self, name: &str) -> Result<()> {
        let state = &self.state;
        if state.lifecycle == Lifecycle::Off {
            return Err(KitchenError::DeviceNotPowered);
        }
        if state.mode != Mode::GuidedCooking {
            return Err(KitchenError::invalid(format!(
                "recipes can only run in guided cooking mode (current mode: {})",
                state.mode
            )));
        }
        if state.lifecycle.is_busy() || self.recipe_in_progress() {
            return Err(KitchenError::invalid(format!(
                "cannot start recipe '{name}': the device is busy"
            )));
        }
        Ok(())
    }
}

/// Handle to the state machine of one device.
#[derive(Clone)]
pub struct DeviceStateMachine {
    inner: Arc<Mutex<Inner>>,
    observers: Arc<Observers>,
}

impl fmt::Debug for DeviceStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceStateMachine")
            .field("state", &self.state())
            .field("observers", &self.observers.count())
            .finish()
    }
}

impl DeviceStateMachine {
    /// Create a device in state `Off`.
    pub fn new(ambient_temperature: u32, mode: Mode) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: DeviceState::new(ambient_temperature, mode),
                next_run: 0,
                task_run: None,
                recipe_run: None,
            })),
            observers: Arc::new(Observers::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DeviceState {
        lock(&self.inner).state.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        lock(&self.inner).state.lifecycle
    }

    pub fn mode(&self) -> Mode {
        lock(&self.inner).state.mode
    }

    /// Run `f` under the state lock, then dispatch whatever it produced.
    fn commit<R>(&self, f: impl FnOnce(&mut Inner, &mut Vec<Notification>) -> R) -> R {
        let mut notifications = Vec::new();
        let result = {
            let mut inner = lock(&self.inner);
            f(&mut *inner, &mut notifications)
        };
        if !notifications.is_empty() {
            self.observers.dispatch(notifications);
        }
        result
    }

    /// `Off → On`. Returns `false` (and changes nothing) from any other state.
    pub fn power_on(&self) -> bool {
        self.commit(|inner, out| {
            let ok = inner.apply(Command::PowerOn, out);
            if !ok {
                debug!(state = %inner.state.lifecycle, "power_on ignored; device already powered");
            }
            ok
        })
    }

    /// `On → Off`.
    ///
    /// Returns `Ok(false)` if the device is already off and fails with
    /// `InvalidOperation` while a task or recipe is in progress.
    pub fn power_off(&self) -> Result<bool> {
        self.commit(|inner, out| {
            let lifecycle = inner.state.lifecycle;
            if lifecycle == Lifecycle::Off {
                return Ok(false);
            }
            if lifecycle.is_busy() || inner.recipe_in_progress() {
                warn!(state = %lifecycle, "refusing to power off while work is in progress");
                return Err(KitchenError::invalid(format!(
                    "cannot power off while the device is {lifecycle}; stop the current task first"
                )));
            }
            inner.apply(Command::PowerOff, out);
            inner.reset_readouts(out);
            Ok(true)
        })
    }

    /// `Running → Paused`.
    pub fn pause(&self) -> Result<()> {
        self.commit(|inner, out| {
            if !inner.apply(Command::Pause, out) {
                return Err(KitchenError::invalid(format!(
                    "cannot pause while the device is {}",
                    inner.state.lifecycle
                )));
            }
            inner.reset_readouts(out);
            Ok(())
        })
    }

    /// `Paused → Running`. Elapsed time continues from where it stopped.
    pub fn resume(&self) -> Result<()> {
        self.commit(|inner, out| {
            if !inner.apply(Command::Resume, out) {
                return Err(KitchenError::invalid(format!(
                    "cannot resume while the device is {}",
                    inner.state.lifecycle
                )));
            }
            Ok(())
        })
    }

    /// Force the device `Off`, cancelling any task or recipe in flight.
    ///
    /// Never fails; a no-op when the device is already off.
    pub fn emergency_stop(&self) {
        self.commit(|inner, out| {
            if inner.state.lifecycle == Lifecycle::Off {
                debug!("emergency stop while already off; nothing to do");
                return;
            }

            warn!(
                state = %inner.state.lifecycle,
                task = ?inner.state.active_task.as_ref().map(|t| t.name()),
                recipe = ?inner.state.active_recipe.as_ref().map(|r| r.name.as_str()),
                "EMERGENCY STOP"
            );

            inner.apply(Command::EmergencyStop, out);
            inner.task_run = None;
            inner.recipe_run = None;
            inner.state.active_task = None;
            inner.state.active_recipe = None;
            inner.state.current_step_index = None;
            inner.state.progress = 0;
            inner.reset_readouts(out);
        })
    }

    /// Switch between manual and guided cooking. Only legal while `On` and idle.
    pub fn change_mode(&self, mode: Mode) -> Result<()> {
        self.commit(|inner, _out| {
            let lifecycle = inner.state.lifecycle;
            if lifecycle == Lifecycle::Off {
                return Err(KitchenError::DeviceNotPowered);
            }
            if lifecycle.is_busy() || inner.recipe_in_progress() {
                return Err(KitchenError::invalid(format!(
                    "cannot change mode while the device is {lifecycle}"
                )));
            }
            if inner.state.mode != mode {
                info!(from = %inner.state.mode, to = %mode, "operation mode changed");
                inner.state.mode = mode;
            }
            Ok(())
        })
    }

    pub fn subscribe_state(&self, f: impl Fn(&Lifecycle) + Send + Sync + 'static) -> SubscriptionId {
        self.observers.on_state(f)
    }

    pub fn subscribe_progress(&self, f: impl Fn(&u8) + Send + Sync + 'static) -> SubscriptionId {
        self.observers.on_progress(f)
    }

    pub fn subscribe_parameters(
        &self,
        f: impl Fn(&Readouts) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.on_parameters(f)
    }

    pub fn subscribe_steps(&self, f: impl Fn(&StepChange) + Send + Sync + 'static) -> SubscriptionId {
        self.observers.on_step(f)
    }

    /// Returns `false` if the subscription was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    // ---------------------------------------------------------------------
    // Executor-facing operations.
    // ---------------------------------------------------------------------

    /// Start running `task`: `On → Running`.
    ///
    /// `recipe` must be the caller's recipe run when a recipe holds the device.
    pub(crate) fn begin_task(&self, task: Arc<Task>, recipe: Option<RunId>) -> Result<RunId> {
        self.commit(|inner, out| {
            let lifecycle = inner.state.lifecycle;
            if lifecycle == Lifecycle::Off {
                return Err(KitchenError::DeviceNotPowered);
            }
            if lifecycle.is_busy() {
                return Err(KitchenError::invalid(format!(
                    "cannot start '{}': another task is {lifecycle}",
                    task.name()
                )));
            }
            if inner.recipe_run != recipe {
                let reason = if inner.recipe_in_progress() {
                    "a recipe is in progress"
                } else {
                    "its recipe run was cancelled"
                };
                return Err(KitchenError::invalid(format!(
                    "cannot start '{}': {reason}",
                    task.name()
                )));
            }
            if !inner.apply(Command::Start, out) {
                return Err(KitchenError::invalid(format!(
                    "cannot start '{}' while the device is {lifecycle}",
                    task.name()
                )));
            }

            let run = inner.issue_run();
            info!(
                task = %task.name(),
                duration_s = task.duration_seconds(),
                run_id = run.0,
                "task started"
            );
            inner.task_run = Some(run);
            inner.state.active_task = Some(task);
            inner.state.progress = 0;
            out.push(Notification::Progress(0));
            Ok(run)
        })
    }

    /// Commit one tick of `dt` for the task run `run`.
    ///
    /// `elapsed` is the executor's running total; it only advances while the
    /// device is `Running`.
    pub(crate) fn commit_tick(&self, run: RunId, dt: Duration, elapsed: &mut Duration) -> TickOutcome {
        self.commit(|inner, out| {
            if inner.task_run != Some(run) {
                debug!(run_id = run.0, "tick for a cancelled run");
                return TickOutcome::Aborted;
            }

            match inner.state.lifecycle {
                Lifecycle::Paused => TickOutcome::Suspended,
                Lifecycle::Running => {
                    let Some(task) = inner.state.active_task.clone() else {
                        return TickOutcome::Aborted;
                    };

                    *elapsed += dt;
                    let duration = task.duration();

                    if *elapsed >= duration {
                        inner.state.progress = 100;
                        out.push(Notification::Progress(100));
                        inner.apply(Command::Finish, out);
                        inner.reset_readouts(out);
                        inner.state.active_task = None;
                        inner.state.progress = 0;
                        inner.task_run = None;
                        info!(task = %task.name(), run_id = run.0, "task completed");
                        return TickOutcome::Completed;
                    }

                    let pct = progress_percent(*elapsed, duration).max(inner.state.progress);
                    inner.state.progress = pct;

                    let baseline = inner.state.baseline();
                    let readouts = Readouts {
                        speed: task.target_speed().map_or(baseline.speed, |target| {
                            interpolate(baseline.speed, target, *elapsed, duration, task.ramp())
                        }),
                        temperature: task.target_temperature().map_or(
                            baseline.temperature,
                            |target| {
                                interpolate(
                                    baseline.temperature,
                                    target,
                                    *elapsed,
                                    duration,
                                    task.ramp(),
                                )
                            },
                        ),
                    };
                    inner.set_readouts(readouts, out);
                    out.push(Notification::Progress(pct));

                    debug!(
                        task = %task.name(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        progress = pct,
                        speed = readouts.speed,
                        temperature = readouts.temperature,
                        "tick"
                    );
                    TickOutcome::Advanced(pct)
                }
                Lifecycle::On | Lifecycle::Off => TickOutcome::Aborted,
            }
        })
    }

    /// Release task run `run` after its executor stopped driving it without
    /// finishing: `Running | Paused → On`, task state cleared.
    ///
    /// A no-op once the run completed, was aborted or was superseded.
    pub(crate) fn abandon_task(&self, run: RunId) {
        self.commit(|inner, out| {
            if inner.task_run != Some(run) {
                return;
            }
            warn!(
                run_id = run.0,
                task = ?inner.state.active_task.as_ref().map(|t| t.name()),
                progress = inner.state.progress,
                "task run dropped before finishing; releasing the device"
            );
            inner.apply(Command::Abandon, out);
            inner.task_run = None;
            inner.state.active_task = None;
            inner.state.progress = 0;
            inner.reset_readouts(out);
        })
    }

    /// Whether a recipe named `name` could start right now. Changes nothing.
    pub(crate) fn check_recipe_start(&self, name: &str) -> Result<()> {
        lock(&self.inner).check_recipe_start(name)
    }

    /// Reserve the device for `recipe`.
    pub(crate) fn begin_recipe(&self, recipe: Arc<Recipe>) -> Result<RunId> {
        self.commit(|inner, _out| {
            inner.check_recipe_start(&recipe.name)?;

            let run = inner.issue_run();
            info!(
                recipe = %recipe.name,
                steps = recipe.step_count(),
                run_id = run.0,
                "recipe started"
            );
            inner.recipe_run = Some(run);
            inner.state.current_step_index = Some(0);
            inner.state.active_recipe = Some(recipe);
            Ok(run)
        })
    }

    /// Move the recipe run to step `index`. Returns `false` if the run has
    /// been cancelled in the meantime.
    pub(crate) fn enter_step(&self, run: RunId, index: usize) -> bool {
        self.commit(|inner, out| {
            if inner.recipe_run != Some(run) {
                return false;
            }
            let Some(recipe) = inner.state.active_recipe.as_ref() else {
                return false;
            };
            let change = StepChange {
                recipe: recipe.name.clone(),
                index,
                total: recipe.step_count(),
            };
            debug!(recipe = %change.recipe, step = index, total = change.total, "entering recipe step");
            inner.state.current_step_index = Some(index);
            out.push(Notification::Step(change));
            true
        })
    }

    pub(crate) fn recipe_is_current(&self, run: RunId) -> bool {
        lock(&self.inner).recipe_run == Some(run)
    }

    /// Release the device from recipe run `run` (no-op if already cancelled).
    pub(crate) fn end_recipe(&self, run: RunId) {
        self.commit(|inner, _out| {
            if inner.recipe_run == Some(run) {
                inner.recipe_run = None;
                inner.state.active_recipe = None;
                inner.state.current_step_index = None;
            }
        })
    }
}
