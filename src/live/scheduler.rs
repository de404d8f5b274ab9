use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::live::Generation;

/// Refresh timer owned by a [`QueryController`](crate::live::QueryController).
///
/// At most one tick is pending at a time. After `disarm` returns, no tick
/// from an earlier `arm` may be delivered.
pub trait Scheduler {
    fn arm(&mut self, interval: Duration, generation: Generation);
    fn disarm(&mut self);
}

/// Sends the armed generation down a channel once the interval elapses.
#[derive(Debug)]
pub struct TokioScheduler {
    ticks: mpsc::UnboundedSender<Generation>,
    pending: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(ticks: mpsc::UnboundedSender<Generation>) -> Self {
        Self {
            ticks,
            pending: None,
        }
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, interval: Duration, generation: Generation) {
        self.disarm();
        let ticks = self.ticks.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = ticks.send(generation);
        }));
    }

    fn disarm(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Scheduler that only records what it was asked to do, for driving a
/// controller by hand.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ManualScheduler {
    pub armed: Option<(Duration, Generation)>,
    pub arm_count: usize,
    pub disarm_count: usize,
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, interval: Duration, generation: Generation) {
        self.armed = Some((interval, generation));
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed = None;
        self.disarm_count += 1;
    }
}
