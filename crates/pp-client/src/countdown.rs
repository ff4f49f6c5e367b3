//! Visible countdown for a pending one-time code.
//!
//! Ticks once per second on a spawned task and stops at zero. Dropping the
//! countdown aborts the task, so no update fires after the challenge is gone.
//! Display only: verification checks the code's own expiry.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct CodeCountdown {
    remaining: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl CodeCountdown {
    /// Starts counting down from `seconds`. Must run inside a Tokio runtime.
    pub fn start(seconds: u32) -> Self {
        let (tx, rx) = watch::channel(seconds);
        let task = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut left = seconds;
            while left > 0 {
                ticks.tick().await;
                left -= 1;
                if tx.send(left).is_err() {
                    break;
                }
            }
        });

        Self {
            remaining: rx,
            task,
        }
    }

    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// At zero the UI offers a new code.
    pub fn is_expired(&self) -> bool {
        self.remaining() == 0
    }

    /// Receiver for tick updates; closes once the countdown ends or is dropped.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    /// `m:ss`
    pub fn display(&self) -> String {
        format_remaining(self.remaining())
    }
}

impl Drop for CodeCountdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
