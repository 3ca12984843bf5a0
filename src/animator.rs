/// Amount reveal animation
///
/// Counts up to a target in `tick_count` equally spaced ticks. Intermediate
/// ticks show the floor of the accumulated increment `target / tick_count`;
/// the last tick is always exactly the target.
use std::time::{Duration, Instant};

/// Lazy sequence of reveal values, independent of time
#[derive(Debug, Clone)]
pub struct RevealSequence {
    target: u64,
    tick_count: u32,
    emitted: u32,
}

/// Values a reveal toward `target` emits, in order
pub fn reveal_sequence(target: u64, tick_count: u32) -> RevealSequence {
    let tick_count = tick_count.max(1);
    RevealSequence {
        target,
        tick_count,
        emitted: 0,
    }
}

impl RevealSequence {
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.tick_count
    }
}

impl Iterator for RevealSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.is_finished() {
            return None;
        }

        self.emitted += 1;
        if self.emitted == self.tick_count {
            return Some(self.target);
        }

        // floor(emitted * target / tick_count) without float drift
        let accumulated =
            u128::from(self.target) * u128::from(self.emitted) / u128::from(self.tick_count);
        Some(accumulated as u64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.tick_count - self.emitted) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RevealSequence {}

/// One reveal in progress
#[derive(Debug, Clone)]
struct AnimationRun {
    started_at: Instant,
    interval: Duration,
    values: RevealSequence,
}

impl AnimationRun {
    fn next_due(&self) -> Option<Instant> {
        if self.values.is_finished() {
            return None;
        }
        Some(self.started_at + self.interval * (self.values.emitted + 1))
    }
}

/// Time-driven reveal
#[derive(Debug, Default)]
pub struct AmountAnimator {
    run: Option<AnimationRun>,
}

impl AmountAnimator {
    pub fn new() -> Self {
        Self { run: None }
    }

    /// Begin a reveal, replacing any run in progress
    pub fn start(&mut self, now: Instant, target: u64, duration: Duration, tick_count: u32) {
        let values = reveal_sequence(target, tick_count);
        let interval = duration / values.tick_count();

        tracing::debug!(
            "Starting reveal toward {} over {:?} in {} ticks",
            target,
            duration,
            values.tick_count()
        );

        self.run = Some(AnimationRun {
            started_at: now,
            interval,
            values,
        });
    }

    /// Emit every tick due by `now`, in order. Returns how many were emitted.
    ///
    /// The run is dropped once its final tick has been emitted.
    pub fn poll(&mut self, now: Instant, mut on_tick: impl FnMut(u64)) -> usize {
        let Some(run) = self.run.as_mut() else {
            return 0;
        };

        let mut emitted = 0;
        while let Some(due) = run.next_due() {
            if now < due {
                break;
            }
            if let Some(value) = run.values.next() {
                on_tick(value);
                emitted += 1;
            }
        }

        if run.values.is_finished() {
            self.run = None;
        }

        emitted
    }

    /// Stop the reveal; no further ticks are emitted
    pub fn cancel(&mut self) -> bool {
        self.run.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.run.as_ref().and_then(AnimationRun::next_due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_sequence_shape() {
        let values: Vec<u64> = reveal_sequence(2000, 60).collect();

        assert_eq!(values.len(), 60);
        assert_eq!(values.last(), Some(&2000));
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|&v| v <= 2000));
        // 2000 / 60 = 33.33...
        assert_eq!(values[0], 33);
        assert_eq!(values[2], 100);
    }

    #[test]
    fn test_reveal_sequence_forces_exact_target() {
        // 1 / 3 floors to zero until the final tick
        let values: Vec<u64> = reveal_sequence(1, 3).collect();
        assert_eq!(values, vec![0, 0, 1]);
    }

    #[test]
    fn test_zero_ticks_emit_target_once() {
        let values: Vec<u64> = reveal_sequence(500, 0).collect();
        assert_eq!(values, vec![500]);
    }

    #[test]
    fn test_poll_emits_due_ticks() {
        let start = Instant::now();
        let mut animator = AmountAnimator::new();
        animator.start(start, 2000, Duration::from_millis(1500), 60);

        let mut seen = Vec::new();
        assert_eq!(animator.poll(start, |v| seen.push(v)), 0);

        // 25ms per tick
        assert_eq!(animator.poll(start + Duration::from_millis(25), |v| seen.push(v)), 1);
        assert_eq!(animator.poll(start + Duration::from_millis(100), |v| seen.push(v)), 3);
        assert_eq!(seen, vec![33, 66, 100, 133]);
        assert_eq!(
            animator.next_deadline(),
            Some(start + Duration::from_millis(125))
        );
    }

    #[test]
    fn test_poll_finishes_run() {
        let start = Instant::now();
        let mut animator = AmountAnimator::new();
        animator.start(start, 2000, Duration::from_millis(1500), 60);

        let mut seen = Vec::new();
        let emitted = animator.poll(start + Duration::from_secs(10), |v| seen.push(v));

        assert_eq!(emitted, 60);
        assert_eq!(seen.last(), Some(&2000));
        assert!(!animator.is_running());
        assert_eq!(animator.poll(start + Duration::from_secs(20), |v| seen.push(v)), 0);
        assert_eq!(seen.len(), 60);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let start = Instant::now();
        let mut animator = AmountAnimator::new();
        animator.start(start, 2000, Duration::from_millis(1500), 60);

        assert!(animator.cancel());
        assert!(animator.next_deadline().is_none());
        assert_eq!(animator.poll(start + Duration::from_secs(5), |_| {}), 0);
    }
}
