pub mod frame;
pub mod timer;

pub use frame::*;
pub use timer::*;
