/// Simulation clock advanced by the host, one frame at a time.
///
/// The demo runs headless, so frames are synthetic and `dt` is fixed by the
/// caller rather than read from a wall clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    pub now: f32,
    pub dt: f32,
}

impl SimClock {
    pub fn new(frame_dt: f32) -> Self {
        Self {
            now: 0.0,
            dt: frame_dt,
        }
    }

    pub fn tick(&mut self) {
        self.now += self.dt;
    }
}

/// Fixed-timestep accumulator for physics sub-steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    pub step: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Bank `frame_dt` and return how many whole steps to run now (possibly zero).
    pub fn advance(&mut self, frame_dt: f32) -> usize {
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// How far into the next step the current frame falls, 0..1.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
