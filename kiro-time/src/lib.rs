mod clock;
mod frame_rate;
mod timecode;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frame_rate::FrameRate;
pub use timecode::{Timecode, TimecodeError};
