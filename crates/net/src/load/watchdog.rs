//! One-shot timeout watchdog for a single load

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Deadline armed at load start and raced against the in-flight work.
///
/// The deadline is fixed at arm time: streaming progress does not push it
/// back, so a slow response can still time out mid-stream. Disarming is by
/// drop; the settle paths simply stop polling [`expired`](Self::expired).
#[derive(Debug)]
pub(super) struct TimeoutWatchdog {
    deadline: Instant,
}

impl TimeoutWatchdog {
    pub(super) fn arm(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Resolves once the deadline has elapsed
    pub(super) async fn expired(&self) {
        sleep_until(self.deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_only_after_the_deadline() {
        let watchdog = TimeoutWatchdog::arm(Duration::from_millis(100));

        tokio::select! {
            () = watchdog.expired() => panic!("fired before the deadline"),
            () = tokio::time::sleep(Duration::from_millis(50)) => {}
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        // Past the deadline now; expired() resolves immediately.
        watchdog.expired().await;
    }
}
