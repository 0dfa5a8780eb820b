use game_types::CountdownStep;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    CountdownTick(CountdownStep),
    ShuffleTick,
    Resolve,
    DismissCelebration,
}

impl TimerKind {
    /// Timers that belong to the round in flight, as opposed to the
    /// celebration overlay which outlives its round.
    pub fn is_round_timer(&self) -> bool {
        !matches!(self, TimerKind::DismissCelebration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub due: Duration,
    pub kind: TimerKind,
    seq: u64,
}

/// Pending deadlines on the session's logical clock. Timers due at the same
/// instant fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerSet {
    pending: Vec<Timer>,
    next_seq: u64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer { due, kind, seq });
    }

    /// Drop every timer of the given kind. Returns how many were removed.
    pub fn cancel(&mut self, kind: TimerKind) -> usize {
        self.cancel_where(|timer| timer.kind == kind)
    }

    pub fn cancel_round(&mut self) -> usize {
        self.cancel_where(|timer| timer.kind.is_round_timer())
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.pending.len();
        self.pending.clear();
        removed
    }

    fn cancel_where(&mut self, predicate: impl Fn(&Timer) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|timer| !predicate(timer));
        before - self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|timer| timer.due).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Timer> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;

        Some(self.pending.swap_remove(index))
    }

    #[cfg(test)]
    pub fn contains(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|timer| timer.kind == kind)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut timers = TimerSet::new();
        timers.schedule(ms(500), TimerKind::Resolve);
        timers.schedule(ms(180), TimerKind::ShuffleTick);
        timers.schedule(ms(4000), TimerKind::DismissCelebration);

        assert_eq!(timers.next_deadline(), Some(ms(180)));
        assert!(timers.pop_due(ms(100)).is_none());

        let first = timers.pop_due(ms(600)).unwrap();
        assert_eq!(first.kind, TimerKind::ShuffleTick);
        let second = timers.pop_due(ms(600)).unwrap();
        assert_eq!(second.kind, TimerKind::Resolve);
        assert!(timers.pop_due(ms(600)).is_none());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut timers = TimerSet::new();
        timers.schedule(ms(500), TimerKind::CountdownTick(CountdownStep::Two));
        timers.schedule(ms(500), TimerKind::ShuffleTick);

        assert_eq!(
            timers.pop_due(ms(500)).unwrap().kind,
            TimerKind::CountdownTick(CountdownStep::Two)
        );
        assert_eq!(timers.pop_due(ms(500)).unwrap().kind, TimerKind::ShuffleTick);
    }

    #[test]
    fn test_cancel_round_keeps_celebration() {
        let mut timers = TimerSet::new();
        timers.schedule(ms(500), TimerKind::CountdownTick(CountdownStep::Two));
        timers.schedule(ms(180), TimerKind::ShuffleTick);
        timers.schedule(ms(2000), TimerKind::Resolve);
        timers.schedule(ms(4000), TimerKind::DismissCelebration);

        assert_eq!(timers.cancel_round(), 3);
        assert!(timers.contains(TimerKind::DismissCelebration));
        assert_eq!(timers.clear(), 1);
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
    }
}
