pub mod config;
pub mod event;
pub mod filter;
pub mod mtc;
pub mod protocol;

pub use config::{GeneratorConfig, MtcConfig, ReceiverConfig};
pub use event::Event;
pub use filter::Filter;
pub use mtc::{
  Direction, Generator, GeneratorError, GeneratorState, GeneratorStats, Receiver, ReceiverError,
  ReceiverEvent, ReceiverHandler, ReceiverState, Transport, TransportError,
};
pub use protocol::codec::{CodecError, Encoding, Malformed, ProtocolVersion};
pub use protocol::decoder::UmpDecoder;
pub use protocol::messages;
pub use protocol::parser::{Midi1Parser, ParserError};

pub use kiro_midi_core::{
  ChannelVoiceValue, PitchBendValue, RangeError, UInt14, UInt4, UInt7, UInt9, Velocity,
};
pub use kiro_time::{Clock, FrameRate, ManualClock, MonotonicClock, Timecode, TimecodeError};
