use kiro_midi_core::UInt4;
use kiro_time::Timecode;

use crate::event::Event;
use crate::mtc::full_frame::full_frame;
use crate::mtc::quarter_frame::{quarter_frame, PIECES};
use crate::protocol::messages::system_common::MidiTimeCode;
use crate::protocol::messages::Message;

/// Produces the quarter-frame sequence of a running timecode.
///
/// The timecode is latched when piece 0 goes out, so the 8 pieces of a cycle
/// always describe the same position. The running timecode moves one frame
/// every 4 pieces, which makes consecutive cycles 2 frames apart.
#[derive(Debug, Clone)]
pub struct Encoder {
  group: UInt4,
  current: Timecode,
  latched: Timecode,
  piece: u8,
}

impl Encoder {
  pub fn new(timecode: Timecode) -> Self {
    Self {
      group: UInt4::MIN,
      current: timecode,
      latched: timecode,
      piece: 0,
    }
  }

  #[must_use]
  pub fn with_group(mut self, group: UInt4) -> Self {
    self.group = group;
    self
  }

  /// Jumps to `timecode`, restarting the sequence at piece 0.
  pub fn locate(&mut self, timecode: Timecode) {
    self.current = timecode;
    self.latched = timecode;
    self.piece = 0;
  }

  pub fn timecode(&self) -> Timecode {
    self.current
  }

  pub fn piece(&self) -> u8 {
    self.piece
  }

  pub fn next_piece(&mut self) -> MidiTimeCode {
    if self.piece == 0 {
      self.latched = self.current;
    }
    let piece = quarter_frame(&self.latched, self.piece);
    self.piece = (self.piece + 1) % PIECES;
    if self.piece % 4 == 0 {
      self.current = self.current.next_frame();
    }
    piece
  }

  pub fn next_quarter_frame(&mut self) -> Event {
    Event::time_code_quarter_frame(self.next_piece()).with_group(self.group)
  }

  pub fn full_frame(&self) -> Event {
    Event::new(self.group, Message::SystemExclusive(full_frame(&self.current)))
  }
}
