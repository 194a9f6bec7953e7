use super::notification_bus::{BusEvent, NotificationBus};
use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Background refresh loop for one view.
///
/// Runs `refresh` once immediately, then whenever a matching bus event arrives and on every
/// polling tick. Dropping the handle stops the loop.
pub struct LiveView {
    handle: JoinHandle<()>,
}

impl LiveView {
    pub fn spawn<P, F, Fut>(
        bus: &NotificationBus,
        poll_interval: Option<Duration>,
        filter: P,
        mut refresh: F,
    ) -> Self
    where
        P: Fn(&BusEvent) -> bool + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let mut events = bus.subscribe();
        let mut ticker = poll_interval.filter(|d| !d.is_zero()).map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        let handle = tokio::spawn(async move {
            refresh().await;
            loop {
                tokio::select! {
                    received = events.recv() => match received {
                        Ok(event) if filter(&event) => {
                            trace!(?event, "live view refresh on event");
                            refresh().await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "live view lagged behind bus");
                            refresh().await;
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = tick(&mut ticker) => {
                        refresh().await;
                    }
                }
            }
        });

        Self { handle }
    }

    /// Refreshes on submitted-work changes, polling every `poll_interval`.
    pub fn submitted_work<F, Fut>(
        bus: &NotificationBus,
        poll_interval: Option<Duration>,
        refresh: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        Self::spawn(bus, poll_interval, BusEvent::touches_submitted_work, refresh)
    }

    /// Refreshes on profile and feedback changes, polling every `poll_interval`.
    pub fn profile<F, Fut>(bus: &NotificationBus, poll_interval: Option<Duration>, refresh: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        Self::spawn(bus, poll_interval, BusEvent::touches_profiles, refresh)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for LiveView {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
