pub mod math;
pub mod time;

// Vector math, float ordering and millisecond time shared by every crate.
pub use time::*;
