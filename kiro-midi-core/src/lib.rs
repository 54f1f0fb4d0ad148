pub mod integers;
pub mod values;

pub use integers::{RangeError, UInt14, UInt4, UInt7, UInt9};
pub use values::{ChannelVoiceValue, PitchBendValue, ScaledValue, Validated, Velocity};
