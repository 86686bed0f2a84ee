use foundation::time::Millis;

/// Render-loop tick.
///
/// The host drives one `Frame` per animation callback; its timestamp is what
/// due timers are compared against. Replays construct frames with a fixed
/// step so a recorded session produces the same timer firings every run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Frame step in milliseconds.
    pub dt_ms: u64,
    /// Time at the start of the frame.
    pub now: Millis,
}

impl Frame {
    pub fn new(index: u64, dt_ms: u64) -> Self {
        Self {
            index,
            dt_ms,
            now: Millis(index.saturating_mul(dt_ms)),
        }
    }

    /// Frame stamped with a host-supplied clock instead of `index * dt_ms`.
    pub fn at(index: u64, dt_ms: u64, now: Millis) -> Self {
        Self { index, dt_ms, now }
    }

    pub fn next(self) -> Self {
        Self::at(self.index + 1, self.dt_ms, self.now.saturating_add(self.dt_ms))
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_ms as f64 / 1000.0
    }
}
