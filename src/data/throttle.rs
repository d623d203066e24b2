//! Client-side request throttle over a trailing time window.

use std::{collections::VecDeque, time::Duration};

use tokio::{
    sync::Mutex,
    time::{sleep, Instant},
};
use tracing::trace;

/// Allows at most `limit` dispatches within any trailing `window`.
#[derive(Debug)]
pub struct Throttle {
    limit: usize,
    window: Duration,
    sent: Mutex<VecDeque<Instant>>,
}

impl Throttle {
    pub fn per_second(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(1))
    }

    pub fn new(limit: usize, window: Duration) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            window,
            sent: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Wait until a dispatch fits in the window, then record it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut sent = self.sent.lock().await;
                let now = Instant::now();
                while sent
                    .front()
                    .is_some_and(|first| now.duration_since(*first) >= self.window)
                {
                    sent.pop_front();
                }
                if sent.len() < self.limit {
                    sent.push_back(now);
                    return;
                }
                match sent.front() {
                    Some(first) => self.window.saturating_sub(now.duration_since(*first)),
                    None => Duration::ZERO,
                }
            };
            trace!(?wait, "throttled");
            sleep(wait).await;
        }
    }
}
