use std::time::{Duration, Instant};

pub(crate) const TICK: Duration = Duration::from_secs(1);

/// Source of "now" for the countdown and the transition schedule.
pub(crate) trait Clock {
    fn now(&self) -> Instant;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Running { next_tick: Instant },
    Expired,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tick {
    Counted(u8),
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Urgency {
    Normal,
    Warning,
    Danger,
}

/// Per-question countdown, one decrement per elapsed second.
#[derive(Clone, Debug)]
pub(crate) struct Countdown {
    seconds: u8,
    remaining: u8,
    phase: Phase,
}

impl Countdown {
    pub(crate) fn new(seconds: u8) -> Self {
        Self {
            seconds,
            remaining: seconds,
            phase: Phase::Idle,
        }
    }

    pub(crate) fn start(&mut self, now: Instant) {
        self.cancel();
        self.remaining = self.seconds;
        self.phase = Phase::Running {
            next_tick: now + TICK,
        };
    }

    pub(crate) fn cancel(&mut self) {
        if self.is_running() {
            self.phase = Phase::Cancelled;
        }
    }

    /// Delivers at most one due tick; call in a loop to catch up after a stall.
    pub(crate) fn poll(&mut self, now: Instant) -> Option<Tick> {
        let Phase::Running { next_tick } = self.phase else {
            return None;
        };
        if now < next_tick {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = Phase::Expired;
            Some(Tick::Expired)
        } else {
            self.phase = Phase::Running {
                next_tick: next_tick + TICK,
            };
            Some(Tick::Counted(self.remaining))
        }
    }

    pub(crate) fn remaining(&self) -> u8 {
        self.remaining
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub(crate) fn urgency(&self) -> Urgency {
        match self.remaining {
            0..=3 => Urgency::Danger,
            4..=5 => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    /// Clock that only moves when told to. Clones share the same instant.
    #[derive(Clone)]
    pub(crate) struct ManualClock {
        now: Rc<Cell<Instant>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                now: Rc::new(Cell::new(Instant::now())),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.now.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    fn drain(cd: &mut Countdown, now: Instant) -> Vec<Tick> {
        let mut out = Vec::new();
        while let Some(t) = cd.poll(now) {
            out.push(t);
        }
        out
    }

    #[test]
    fn starts_idle_with_full_time() {
        let cd = Countdown::new(10);
        assert_eq!(cd.phase(), Phase::Idle);
        assert_eq!(cd.remaining(), 10);
    }

    #[test]
    fn decrements_once_per_second_down_to_zero() {
        let clock = ManualClock::new();
        let mut cd = Countdown::new(10);
        cd.start(clock.now());

        let mut seen = Vec::new();
        for _ in 0..10 {
            assert_eq!(cd.poll(clock.now()), None);
            clock.advance(TICK);
            seen.extend(drain(&mut cd, clock.now()));
        }

        let mut expected: Vec<Tick> = (1..10).rev().map(Tick::Counted).collect();
        expected.push(Tick::Expired);
        assert_eq!(seen, expected);
        assert_eq!(cd.remaining(), 0);
        assert_eq!(cd.phase(), Phase::Expired);

        // stays at zero afterwards
        clock.advance(TICK * 5);
        assert_eq!(cd.poll(clock.now()), None);
        assert_eq!(cd.remaining(), 0);
    }

    #[test]
    fn sub_second_progress_does_not_tick() {
        let clock = ManualClock::new();
        let mut cd = Countdown::new(10);
        cd.start(clock.now());
        clock.advance(Duration::from_millis(999));
        assert_eq!(cd.poll(clock.now()), None);
        clock.advance(Duration::from_millis(1));
        assert_eq!(cd.poll(clock.now()), Some(Tick::Counted(9)));
    }

    #[test]
    fn catches_up_after_a_stall() {
        let clock = ManualClock::new();
        let mut cd = Countdown::new(10);
        cd.start(clock.now());
        clock.advance(Duration::from_millis(3500));
        assert_eq!(
            drain(&mut cd, clock.now()),
            vec![Tick::Counted(9), Tick::Counted(8), Tick::Counted(7)]
        );
        assert_eq!(cd.remaining(), 7);
    }

    #[test]
    fn cancel_freezes_remaining() {
        let clock = ManualClock::new();
        let mut cd = Countdown::new(10);
        cd.start(clock.now());
        clock.advance(TICK * 3);
        drain(&mut cd, clock.now());
        cd.cancel();
        assert_eq!(cd.phase(), Phase::Cancelled);

        clock.advance(TICK * 20);
        assert_eq!(cd.poll(clock.now()), None);
        assert_eq!(cd.remaining(), 7);
    }

    #[test]
    fn restart_replaces_the_running_countdown() {
        let clock = ManualClock::new();
        let mut cd = Countdown::new(10);
        cd.start(clock.now());
        clock.advance(TICK * 4);
        drain(&mut cd, clock.now());
        assert_eq!(cd.remaining(), 6);

        cd.start(clock.now());
        assert_eq!(cd.remaining(), 10);
        assert!(cd.is_running());
        // the old schedule is gone: nothing due right away
        assert_eq!(cd.poll(clock.now()), None);
    }

    #[test]
    fn urgency_thresholds() {
        let clock = ManualClock::new();
        let mut cd = Countdown::new(10);
        cd.start(clock.now());
        assert_eq!(cd.urgency(), Urgency::Normal);
        clock.advance(TICK * 5);
        drain(&mut cd, clock.now());
        assert_eq!(cd.urgency(), Urgency::Warning);
        clock.advance(TICK * 2);
        drain(&mut cd, clock.now());
        assert_eq!(cd.remaining(), 3);
        assert_eq!(cd.urgency(), Urgency::Danger);
    }
}
