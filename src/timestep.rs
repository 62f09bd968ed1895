use std::time::{Duration, Instant};

/// Turns variable frame times into a whole number of fixed-size steps.
///
/// Real time is added to an accumulator; every full `step` in it runs one
/// simulation step and is taken out again. The remainder waits for the next
/// frame, so the simulation rate does not depend on how often frames arrive.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    last_tick: Option<Instant>,
    total_steps: u64,
}

impl FixedTimestep {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            last_tick: None,
            total_steps: 0,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time waiting to be simulated.
    pub fn backlog(&self) -> Duration {
        self.accumulator
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Measures real time since the previous tick and runs the steps it covers.
    /// The first tick only starts the clock.
    pub fn tick(&mut self, now: Instant, on_step: impl FnMut(Duration)) -> u32 {
        let elapsed = match self.last_tick {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        self.advance(elapsed, on_step)
    }

    /// Adds `elapsed` and calls `on_step` once per full step, returning the count.
    pub fn advance(&mut self, elapsed: Duration, mut on_step: impl FnMut(Duration)) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.step {
            on_step(self.step);
            self.accumulator -= self.step;
            steps += 1;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Forgets the backlog and restarts the clock, e.g. after a pause.
    pub fn reset_clock(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last_tick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_nanos(16_666_666);

    #[test]
    fn test_less_than_a_step_runs_nothing() {
        let mut timestep = FixedTimestep::new(STEP);
        let steps = timestep.advance(STEP - Duration::from_nanos(1), |_| {});
        assert_eq!(steps, 0);
        assert_eq!(timestep.backlog(), STEP - Duration::from_nanos(1));
    }

    #[test]
    fn test_exact_multiple_runs_every_step() {
        let mut timestep = FixedTimestep::new(STEP);
        assert_eq!(timestep.advance(STEP * 3, |_| {}), 3);
        assert_eq!(timestep.backlog(), Duration::ZERO);
    }

    #[test]
    fn test_each_step_gets_fixed_delta() {
        let mut timestep = FixedTimestep::new(STEP);
        let mut deltas = Vec::new();
        timestep.advance(Duration::from_millis(50), |dt| deltas.push(dt));
        assert_eq!(deltas, vec![STEP, STEP, STEP]);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut timestep = FixedTimestep::new(STEP);
        assert_eq!(timestep.advance(Duration::from_millis(10), |_| {}), 0);
        assert_eq!(timestep.advance(Duration::from_millis(10), |_| {}), 1);
        assert_eq!(timestep.total_steps(), 1);
    }

    #[test]
    fn test_first_tick_only_starts_clock() {
        let mut timestep = FixedTimestep::new(STEP);
        let start = Instant::now();
        assert_eq!(timestep.tick(start, |_| {}), 0);
        assert_eq!(timestep.tick(start + Duration::from_millis(100), |_| {}), 6);
    }

    #[test]
    fn test_reset_clock_drops_backlog() {
        let mut timestep = FixedTimestep::new(STEP);
        timestep.advance(Duration::from_millis(10), |_| {});
        timestep.reset_clock();
        assert_eq!(timestep.backlog(), Duration::ZERO);

        let start = Instant::now();
        assert_eq!(timestep.tick(start + Duration::from_secs(5), |_| {}), 0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_runs_floor_of_elapsed_over_step(elapsed_nanos in 0u64..5_000_000_000) {
                let mut timestep = FixedTimestep::new(STEP);
                let mut calls = 0u64;
                let steps = timestep.advance(Duration::from_nanos(elapsed_nanos), |_| calls += 1);

                let expected = elapsed_nanos / STEP.as_nanos() as u64;
                prop_assert_eq!(u64::from(steps), expected);
                prop_assert_eq!(calls, expected);
                prop_assert!(timestep.backlog() < STEP);
            }
        }
    }
}
