// src/exec/ticker.rs

//! Pluggable tick source for the executor timing loop.
//!
//! The executors never sleep directly; they ask a [`Ticker`] for the next tick
//! and get back the amount of device time that tick represents.
//!
//! - [`IntervalTickSource`] is the production implementation, backed by a
//!   `tokio::time::Interval`.
//! - Tests can provide their own `TickSource` that, for example, fires hooks
//!   at given tick numbers without sleeping at all.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// One executor's view of time.
pub trait Ticker: Send {
    /// Wait for the next tick and return the device time it covers.
    fn tick(&mut self) -> Pin<Box<dyn Future<Output = Duration> + Send + '_>>;
}

/// Factory handing a fresh [`Ticker`] to every task run.
pub trait TickSource: Send + Sync {
    fn ticker(&self) -> Box<dyn Ticker>;
}

/// Ticks every `period` of wall-clock (tokio) time.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTickSource {
    period: Duration,
}

impl IntervalTickSource {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for IntervalTickSource {
    fn ticker(&self) -> Box<dyn Ticker> {
        // `interval` fires immediately; start one period out so the first
        // tick really covers `period` of device time.
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Box::new(IntervalTicker {
            interval,
            period: self.period,
        })
    }
}

struct IntervalTicker {
    interval: Interval,
    period: Duration,
}

impl Ticker for IntervalTicker {
    fn tick(&mut self) -> Pin<Box<dyn Future<Output = Duration> + Send + '_>> {
        Box::pin(async move {
            self.interval.tick().await;
            self.period
        })
    }
}
