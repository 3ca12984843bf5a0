/// One-shot delayed transition scheduling
///
/// Holds at most one pending request. Scheduling again supersedes (and drops)
/// whatever was pending, so a payload fires at most once and only the latest
/// one ever fires.
use std::time::{Duration, Instant};

/// Identifies one call to [`TransitionScheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleToken(u64);

#[derive(Debug)]
struct Pending<T> {
    token: ScheduleToken,
    due: Instant,
    payload: T,
}

/// Single-slot timer, polled by its owner
#[derive(Debug)]
pub struct TransitionScheduler<T> {
    pending: Option<Pending<T>>,
    next_token: u64,
}

impl<T> TransitionScheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            next_token: 0,
        }
    }

    /// Arm a one-shot that yields `on_fire` once `delay` has elapsed after `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration, on_fire: T) -> ScheduleToken {
        if self.cancel_pending().is_some() {
            tracing::debug!("Superseding pending transition");
        }

        let token = ScheduleToken(self.next_token);
        self.next_token += 1;

        self.pending = Some(Pending {
            token,
            due: now + delay,
            payload: on_fire,
        });

        token
    }

    /// Take the payload if its deadline has been reached
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        self.pending.take().map(|p| p.payload)
    }

    /// Drop the pending request without firing it
    pub fn cancel_pending(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Cancel only if `token` is still the pending request
    pub fn cancel(&mut self, token: ScheduleToken) -> bool {
        let is_current = self.pending.as_ref().is_some_and(|p| p.token == token);
        if is_current {
            self.pending = None;
        }
        is_current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Remaining wait, zero if already due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|due| due.saturating_duration_since(now))
    }
}

impl<T> Default for TransitionScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.schedule(start, Duration::from_millis(2000), "next");

        assert_eq!(scheduler.poll(start + Duration::from_millis(1999)), None);
        assert_eq!(scheduler.poll(start + Duration::from_millis(2000)), Some("next"));
        assert_eq!(scheduler.poll(start + Duration::from_millis(5000)), None);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_second_schedule_supersedes_first() {
        let start = Instant::now();
        let fired = Rc::new(Cell::new(0));
        let last = Rc::new(Cell::new(""));

        let mut scheduler: TransitionScheduler<Box<dyn FnOnce()>> = TransitionScheduler::new();
        for label in ["first", "second"] {
            let fired = Rc::clone(&fired);
            let last = Rc::clone(&last);
            scheduler.schedule(
                start,
                Duration::from_millis(100),
                Box::new(move || {
                    fired.set(fired.get() + 1);
                    last.set(label);
                }),
            );
        }

        for ms in [50, 100, 150, 1000] {
            if let Some(on_fire) = scheduler.poll(start + Duration::from_millis(ms)) {
                on_fire();
            }
        }

        assert_eq!(fired.get(), 1);
        assert_eq!(last.get(), "second");
    }

    #[test]
    fn test_cancel_pending_never_fires() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.schedule(start, Duration::from_millis(10), 1);

        assert_eq!(scheduler.cancel_pending(), Some(1));
        assert_eq!(scheduler.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_cancel_stale_token_is_ignored() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        let first = scheduler.schedule(start, Duration::from_millis(10), 1);
        let second = scheduler.schedule(start, Duration::from_millis(10), 2);

        assert!(!scheduler.cancel(first));
        assert_eq!(scheduler.pending(), Some(&2));
        assert!(scheduler.cancel(second));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_time_until_due() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        assert_eq!(scheduler.time_until_due(start), None);

        scheduler.schedule(start, Duration::from_millis(300), ());
        assert_eq!(
            scheduler.time_until_due(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            scheduler.time_until_due(start + Duration::from_millis(400)),
            Some(Duration::ZERO)
        );
    }
}
