use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub round_id: u64,
}

pub trait TickHandle {
    fn cancel(&mut self);
    fn is_cancelled(&self) -> bool;
}

pub trait Scheduler {
    type Handle: TickHandle;

    fn start(&mut self, round_id: u64, period: Duration) -> Self::Handle;
}

#[derive(Clone, Debug)]
pub struct IntervalScheduler<E> {
    tx: mpsc::Sender<E>,
}

impl<E> IntervalScheduler<E> {
    pub fn new(tx: mpsc::Sender<E>) -> Self {
        Self { tx }
    }
}

impl<E> Scheduler for IntervalScheduler<E>
where
    E: From<Tick> + Send + 'static,
{
    type Handle = IntervalHandle;

    fn start(&mut self, round_id: u64, period: Duration) -> IntervalHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(E::from(Tick { round_id })).await.is_err() {
                    break;
                }
            }
        });
        debug!(
            round_id,
            period_ms = period.as_millis() as u64,
            "tick timer started"
        );
        IntervalHandle {
            round_id,
            task: Some(task),
        }
    }
}

#[derive(Debug)]
pub struct IntervalHandle {
    round_id: u64,
    task: Option<JoinHandle<()>>,
}

impl TickHandle for IntervalHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(round_id = self.round_id, "tick timer cancelled");
        }
    }

    fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SteppedScheduler;

#[derive(Debug, Default)]
pub struct SteppedHandle {
    cancelled: bool,
}

impl Scheduler for SteppedScheduler {
    type Handle = SteppedHandle;

    fn start(&mut self, _round_id: u64, _period: Duration) -> SteppedHandle {
        SteppedHandle::default()
    }
}

impl TickHandle for SteppedHandle {
    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
