//! MIDI Time Code: quarter-frame and full-frame messages, a generator that
//! emits them on schedule and a receiver that locks onto them.

pub mod decoder;
pub mod encoder;
pub mod full_frame;
pub mod generator;
pub mod handler;
pub mod quarter_frame;
pub mod receiver;
pub mod transport;

pub use decoder::{Decoder, Direction, ReceiverEvent, ReceiverState};
pub use encoder::Encoder;
pub use generator::{
  Generator, GeneratorError, GeneratorState, GeneratorStats, Session, TickReport,
};
pub use handler::ReceiverHandler;
pub use receiver::{Receiver, ReceiverError};
pub use transport::{RingBufferTransport, Transport, TransportError};
