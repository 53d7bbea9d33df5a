use solfa_domain::KeyboardKey;

pub type TimerToken = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    ClearErrorKey(KeyboardKey),
    AdvanceQuestion,
    ChallengeTick,
}

#[derive(Clone, Debug)]
struct PendingTimer {
    token: TimerToken,
    due_ms: u64,
    event: TimerEvent,
}

/// Virtual-time timer queue. Nothing fires on its own; the owner pushes
/// time forward with [`Scheduler::advance`], which makes every delayed
/// effect in the trainer synchronously testable.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_token: TimerToken,
    pending: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule_in(&mut self, delay_ms: u64, event: TimerEvent) -> TimerToken {
        self.next_token += 1;
        let token = self.next_token;
        self.pending.push(PendingTimer {
            token,
            due_ms: self.now_ms + delay_ms,
            event,
        });
        token
    }

    pub fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|timer| timer.token != token);
    }

    /// Teardown for a superseded session; no stale callback survives.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Earliest pending deadline, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.iter().map(|timer| timer.due_ms).min()
    }

    /// Move time forward and return the events that came due, ordered by
    /// deadline then registration.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<TimerEvent> {
        self.now_ms += delta_ms;
        let now = self.now_ms;
        let (mut due, rest): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|timer| timer.due_ms <= now);
        self.pending = rest;
        due.sort_by_key(|timer| (timer.due_ms, timer.token));
        due.into_iter().map(|timer| timer.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(500, TimerEvent::AdvanceQuestion);
        scheduler.schedule_in(200, TimerEvent::ChallengeTick);

        assert!(scheduler.advance(100).is_empty());
        assert_eq!(
            scheduler.advance(500),
            vec![TimerEvent::ChallengeTick, TimerEvent::AdvanceQuestion]
        );
        assert_eq!(scheduler.now_ms(), 600);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule_in(100, TimerEvent::AdvanceQuestion);
        scheduler.schedule_in(100, TimerEvent::ChallengeTick);
        scheduler.cancel(token);
        assert_eq!(scheduler.advance(100), vec![TimerEvent::ChallengeTick]);
    }

    #[test]
    fn same_deadline_preserves_registration_order() {
        let mut scheduler = Scheduler::new();
        let key: KeyboardKey = "C4".parse().unwrap();
        scheduler.schedule_in(100, TimerEvent::ClearErrorKey(key));
        scheduler.schedule_in(100, TimerEvent::AdvanceQuestion);
        assert_eq!(
            scheduler.advance(100),
            vec![TimerEvent::ClearErrorKey(key), TimerEvent::AdvanceQuestion]
        );
    }

    #[test]
    fn cancel_all_clears_the_queue() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(100, TimerEvent::AdvanceQuestion);
        scheduler.schedule_in(200, TimerEvent::ChallengeTick);
        scheduler.cancel_all();
        assert_eq!(scheduler.next_due_ms(), None);
        assert!(scheduler.advance(1_000).is_empty());
    }
}
