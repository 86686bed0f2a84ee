/// Monotonic wall-clock instant in whole milliseconds.
///
/// Input events and timers are stamped with this; the origin is whatever the
/// host supplies (page load, process start, or a replay script's zero).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(pub u64);

impl Millis {
    pub fn saturating_add(self, ms: u64) -> Self {
        Millis(self.0.saturating_add(ms))
    }

    pub fn saturating_sub(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
