//! Timers owned by the controller.
//!
//! Every timer is an `Option`; cancelling means dropping it. An empty slot
//! never fires, which lets the controller poll all slots unconditionally.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};

use super::types::{PresenceConfig, Visibility};

#[derive(Default)]
pub(crate) struct TimerSet {
    pub(crate) heartbeat: Option<Interval>,
    pub(crate) count_poll: Option<Interval>,
    pub(crate) token_watch: Option<Interval>,
    /// One-shot; set while a reconnect is pending.
    pub(crate) reconnect: Option<Pin<Box<Sleep>>>,
}

impl TimerSet {
    /// (Re)arm heartbeat and count-poll for the given visibility, replacing
    /// whatever was armed before. Count-poll is not armed while hidden.
    pub(crate) fn arm_activity(&mut self, config: &PresenceConfig, visibility: Visibility) {
        self.heartbeat = Some(repeating(config.heartbeat_for(visibility)));
        self.count_poll = match visibility {
            Visibility::Visible => Some(repeating(config.count_poll)),
            Visibility::Hidden => None,
        };
    }

    pub(crate) fn cancel_activity(&mut self) {
        self.heartbeat = None;
        self.count_poll = None;
    }

    pub(crate) fn arm_token_watch(&mut self, period: Duration) {
        self.token_watch = Some(repeating(period));
    }

    pub(crate) fn arm_reconnect(&mut self, delay: Duration) {
        self.reconnect = Some(Box::pin(sleep(delay)));
    }

    pub(crate) fn reconnect_pending(&self) -> bool {
        self.reconnect.is_some()
    }

    pub(crate) fn cancel_all(&mut self) {
        *self = Self::default();
    }

    /// Number of armed timers.
    pub(crate) fn armed(&self) -> usize {
        [
            self.heartbeat.is_some(),
            self.count_poll.is_some(),
            self.token_watch.is_some(),
            self.reconnect.is_some(),
        ]
        .into_iter()
        .filter(|armed| *armed)
        .count()
    }
}

/// Repeating timer whose first tick is one full period away.
fn repeating(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Resolve on the next tick of `slot`, or never if it is empty.
pub(crate) async fn tick(slot: &mut Option<Interval>) {
    match slot {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending::<()>().await,
    }
}

/// Resolve when the one-shot in `slot` elapses, or never if it is empty.
pub(crate) async fn fire(slot: &mut Option<Pin<Box<Sleep>>>) {
    match slot {
        Some(delay) => delay.as_mut().await,
        None => pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn visible_arms_heartbeat_and_poll() {
        let mut timers = TimerSet::default();
        timers.arm_activity(&PresenceConfig::default(), Visibility::Visible);
        assert!(timers.heartbeat.is_some());
        assert!(timers.count_poll.is_some());
        assert_eq!(timers.armed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_arms_heartbeat_only() {
        let mut timers = TimerSet::default();
        timers.arm_activity(&PresenceConfig::default(), Visibility::Visible);
        timers.arm_activity(&PresenceConfig::default(), Visibility::Hidden);
        assert!(timers.heartbeat.is_some());
        assert!(timers.count_poll.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_clears_every_slot() {
        let mut timers = TimerSet::default();
        timers.arm_activity(&PresenceConfig::default(), Visibility::Visible);
        timers.arm_token_watch(Duration::from_secs(10));
        timers.arm_reconnect(Duration::from_secs(2));
        assert_eq!(timers.armed(), 4);

        timers.cancel_all();
        assert_eq!(timers.armed(), 0);
        assert!(!timers.reconnect_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period() {
        let mut slot = Some(repeating(Duration::from_secs(10)));
        let start = Instant::now();
        tick(&mut slot).await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        tick(&mut slot).await;
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_slots_never_fire() {
        let mut interval: Option<Interval> = None;
        let mut delay: Option<Pin<Box<Sleep>>> = None;
        let outcome = tokio::time::timeout(Duration::from_secs(3600), async {
            tokio::select! {
                _ = tick(&mut interval) => "tick",
                _ = fire(&mut delay) => "fire",
            }
        })
        .await;
        assert!(outcome.is_err());
    }
}
