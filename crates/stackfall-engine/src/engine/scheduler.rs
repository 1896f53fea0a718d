use std::time::Duration;

/// Gravity speed class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickTier {
    /// Level-dependent falling speed.
    Normal,
    /// Lock grace after the piece has landed.
    Sliding,
    /// Soft drop.
    Fast,
}

/// The two periodic timers an engine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Gravity,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PeriodicTimer {
    period: Duration,
    remaining: Duration,
}

impl PeriodicTimer {
    fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "timer period must be non-zero");
        Self {
            period,
            remaining: period,
        }
    }
}

/// Virtual clock driving gravity and auto-repeat.
///
/// Nothing here reads wall-clock time: the host reports how much time has
/// passed and the scheduler says which timer fired. Timers are periodic and
/// restart from a full period after firing or re-arming.
///
/// ```
/// use std::time::Duration;
/// use stackfall_engine::{Scheduler, TimerKind};
///
/// let mut scheduler = Scheduler::new();
/// scheduler.arm_gravity_timer(Duration::from_millis(100));
/// assert_eq!(
///     scheduler.elapse(Duration::from_millis(250)),
///     (Duration::from_millis(100), Some(TimerKind::Gravity))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    gravity: Option<PeriodicTimer>,
    repeat: Option<PeriodicTimer>,
}

impl Scheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gravity: None,
            repeat: None,
        }
    }

    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn arm_gravity_timer(&mut self, period: Duration) {
        self.gravity = Some(PeriodicTimer::new(period));
    }

    pub fn cancel_gravity_timer(&mut self) {
        self.gravity = None;
    }

    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn arm_repeat_timer(&mut self, period: Duration) {
        self.repeat = Some(PeriodicTimer::new(period));
    }

    pub fn cancel_repeat_timer(&mut self) {
        self.repeat = None;
    }

    #[must_use]
    pub fn gravity_period(&self) -> Option<Duration> {
        self.gravity.map(|timer| timer.period)
    }

    #[must_use]
    pub fn is_repeat_armed(&self) -> bool {
        self.repeat.is_some()
    }

    /// Time until the earliest armed timer fires, if any is armed.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        [self.gravity, self.repeat]
            .into_iter()
            .flatten()
            .map(|timer| timer.remaining)
            .min()
    }

    /// Moves the clock forward by at most `budget`, stopping at the first
    /// timer that comes due.
    ///
    /// Returns the time actually consumed and the timer that fired. When
    /// both are due at the same instant gravity fires first; the repeat
    /// timer then fires on the next call with zero time consumed.
    pub fn elapse(&mut self, budget: Duration) -> (Duration, Option<TimerKind>) {
        let step = match self.time_until_next() {
            Some(next) if next <= budget => next,
            _ => {
                self.consume(budget);
                return (budget, None);
            }
        };
        self.consume(step);
        let fired = if let Some(timer) = self.gravity.as_mut().filter(|t| t.remaining.is_zero()) {
            timer.remaining = timer.period;
            TimerKind::Gravity
        } else if let Some(timer) = self.repeat.as_mut().filter(|t| t.remaining.is_zero()) {
            timer.remaining = timer.period;
            TimerKind::Repeat
        } else {
            unreachable!("a timer with zero remaining time must exist")
        };
        (step, Some(fired))
    }

    fn consume(&mut self, elapsed: Duration) {
        for timer in [&mut self.gravity, &mut self.repeat].into_iter().flatten() {
            timer.remaining = timer.remaining.saturating_sub(elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_scheduler_consumes_everything() {
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.time_until_next(), None);
        assert_eq!(scheduler.elapse(ms(5000)), (ms(5000), None));
    }

    #[test]
    fn test_periodic_gravity() {
        let mut scheduler = Scheduler::new();
        scheduler.arm_gravity_timer(ms(800));
        assert_eq!(scheduler.elapse(ms(799)), (ms(799), None));
        assert_eq!(scheduler.time_until_next(), Some(ms(1)));
        assert_eq!(scheduler.elapse(ms(10)), (ms(1), Some(TimerKind::Gravity)));
        assert_eq!(scheduler.time_until_next(), Some(ms(800)));
    }

    #[test]
    fn test_gravity_wins_ties() {
        let mut scheduler = Scheduler::new();
        scheduler.arm_gravity_timer(ms(300));
        scheduler.arm_repeat_timer(ms(300));
        assert_eq!(scheduler.elapse(ms(300)), (ms(300), Some(TimerKind::Gravity)));
        assert_eq!(scheduler.elapse(ms(0)), (ms(0), Some(TimerKind::Repeat)));
        assert_eq!(scheduler.elapse(ms(0)), (ms(0), None));
        assert_eq!(scheduler.time_until_next(), Some(ms(300)));
    }

    #[test]
    fn test_earliest_timer_fires_first() {
        let mut scheduler = Scheduler::new();
        scheduler.arm_gravity_timer(ms(800));
        scheduler.arm_repeat_timer(ms(300));
        assert_eq!(scheduler.elapse(ms(1000)), (ms(300), Some(TimerKind::Repeat)));
        assert_eq!(scheduler.elapse(ms(700)), (ms(300), Some(TimerKind::Repeat)));
        assert_eq!(scheduler.elapse(ms(400)), (ms(200), Some(TimerKind::Gravity)));
    }

    #[test]
    fn test_rearm_restarts_period() {
        let mut scheduler = Scheduler::new();
        scheduler.arm_gravity_timer(ms(800));
        let _ = scheduler.elapse(ms(700));
        scheduler.arm_gravity_timer(ms(100));
        assert_eq!(scheduler.gravity_period(), Some(ms(100)));
        assert_eq!(scheduler.time_until_next(), Some(ms(100)));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        scheduler.arm_gravity_timer(ms(800));
        scheduler.arm_repeat_timer(ms(300));
        scheduler.cancel_repeat_timer();
        assert!(!scheduler.is_repeat_armed());
        scheduler.cancel_gravity_timer();
        assert_eq!(scheduler.gravity_period(), None);
        assert_eq!(scheduler.time_until_next(), None);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_period_panics() {
        Scheduler::new().arm_repeat_timer(Duration::ZERO);
    }
}
