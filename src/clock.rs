use std::time::Instant;

/// Timing information handed to every animated component once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    /// Seconds since the application started.
    pub time: f32,
    /// Seconds since the previous tick.
    pub dt: f32,
}

impl Tick {
    pub fn new(time: f32, dt: f32) -> Self {
        Self { time, dt }
    }
}

/// Wall-clock tick source for the render loop.
pub struct Clock {
    start_time: Instant,
    last_frame: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the clock. Call once per frame.
    pub fn tick(&mut self) -> Tick {
        let now = Instant::now();
        let time = now.duration_since(self.start_time).as_secs_f32();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        Tick { time, dt }
    }
}

/// Deterministic fixed-step tick source.
///
/// Produces the same tick sequence on every run, for tests and headless replays.
///
/// ```
/// use deskfolio::SteppedClock;
///
/// let mut clock = SteppedClock::new(0.5);
/// assert_eq!(clock.tick().time, 0.5);
/// assert_eq!(clock.tick().time, 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct SteppedClock {
    step: f32,
    frames: u64,
}

impl SteppedClock {
    pub fn new(step: f32) -> Self {
        Self { step, frames: 0 }
    }

    pub fn tick(&mut self) -> Tick {
        self.frames += 1;
        // Multiply rather than accumulate so long runs don't drift.
        Tick {
            time: self.frames as f32 * self.step,
            dt: self.step,
        }
    }

    /// Time of the most recent tick.
    pub fn now(&self) -> f32 {
        self.frames as f32 * self.step
    }
}
