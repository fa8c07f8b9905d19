use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kitchenbot::exec::{TickSource, Ticker};

type Hook = Box<dyn FnOnce() + Send>;

/// A tick source that never sleeps.
///
/// Every tick covers `period` of device time and is numbered from 1, counting
/// across all tickers handed out (so a recipe's second step continues the
/// numbering of the first). Hooks registered with [`at_tick`] run right
/// before tick `n` is committed, which makes "pause during tick 3" or "stop
/// during step A" exact and repeatable.
///
/// [`at_tick`]: ScriptedTickSource::at_tick
#[derive(Clone)]
pub struct ScriptedTickSource {
    script: Arc<Script>,
}

struct Script {
    period: Duration,
    count: AtomicU64,
    hooks: Mutex<BTreeMap<u64, Vec<Hook>>>,
}

impl ScriptedTickSource {
    pub fn new(period: Duration) -> Self {
        Self {
            script: Arc::new(Script {
                period,
                count: AtomicU64::new(0),
                hooks: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// 500 ms ticks: a 2 s task completes in exactly 4 running ticks.
    pub fn half_second() -> Self {
        Self::new(Duration::from_millis(500))
    }

    /// Run `f` right before tick `n` is committed.
    pub fn at_tick(&self, n: u64, f: impl FnOnce() + Send + 'static) -> &Self {
        self.script
            .hooks
            .lock()
            .unwrap()
            .entry(n)
            .or_default()
            .push(Box::new(f));
        self
    }

    /// Ticks handed out so far.
    pub fn ticks(&self) -> u64 {
        self.script.count.load(Ordering::SeqCst)
    }

    pub fn as_source(&self) -> Arc<dyn TickSource> {
        Arc::new(self.clone())
    }
}

impl TickSource for ScriptedTickSource {
    fn ticker(&self) -> Box<dyn Ticker> {
        Box::new(ScriptedTicker {
            script: Arc::clone(&self.script),
        })
    }
}

struct ScriptedTicker {
    script: Arc<Script>,
}

impl Ticker for ScriptedTicker {
    fn tick(&mut self) -> Pin<Box<dyn Future<Output = Duration> + Send + '_>> {
        Box::pin(async move {
            let n = self.script.count.fetch_add(1, Ordering::SeqCst) + 1;
            let due = self.script.hooks.lock().unwrap().remove(&n);
            for hook in due.into_iter().flatten() {
                hook();
            }
            // Let other tasks on the runtime observe the device between ticks.
            tokio::task::yield_now().await;
            self.script.period
        })
    }
}
