use kiro_midi_core::{UInt4, UInt7};
use kiro_time::{FrameRate, Timecode, TimecodeError};

use crate::protocol::messages::system_common::MidiTimeCode;

pub const PIECES: u8 = 8;

/// The piece `index` (0..=7) of a timecode.
pub fn quarter_frame(timecode: &Timecode, index: u8) -> MidiTimeCode {
  let index = index % PIECES;
  let nibble = match index {
    0 => timecode.frames() & 0x0f,
    1 => (timecode.frames() >> 4) & 0x01,
    2 => timecode.seconds() & 0x0f,
    3 => (timecode.seconds() >> 4) & 0x03,
    4 => timecode.minutes() & 0x0f,
    5 => (timecode.minutes() >> 4) & 0x03,
    6 => timecode.hours() & 0x0f,
    _ => timecode.rate().mtc_code() << 1 | (timecode.hours() >> 4) & 0x01,
  };
  MidiTimeCode::from_data_byte(UInt7::clamped(index << 4 | nibble))
}

/// Collects the 8 pieces of one quarter-frame cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuarterFrameBuffer {
  pieces: [Option<UInt4>; PIECES as usize],
}

impl QuarterFrameBuffer {
  pub fn insert(&mut self, piece: MidiTimeCode) {
    self.pieces[piece.index() as usize] = Some(piece.nibble());
  }

  pub fn is_empty(&self) -> bool {
    self.pieces.iter().all(Option::is_none)
  }

  pub fn is_complete(&self) -> bool {
    self.pieces.iter().all(Option::is_some)
  }

  pub fn clear(&mut self) {
    self.pieces = [None; PIECES as usize];
  }

  /// `None` until all the pieces are present.
  pub fn assemble(&self) -> Option<Result<Timecode, TimecodeError>> {
    let mut nibbles = [0u8; PIECES as usize];
    for (nibble, piece) in nibbles.iter_mut().zip(self.pieces.iter()) {
      *nibble = piece.as_ref()?.value();
    }

    let frames = nibbles[0] | (nibbles[1] & 0x01) << 4;
    let seconds = nibbles[2] | (nibbles[3] & 0x03) << 4;
    let minutes = nibbles[4] | (nibbles[5] & 0x03) << 4;
    let hours = nibbles[6] | (nibbles[7] & 0x01) << 4;
    let code = (nibbles[7] >> 1) & 0x03;

    let result = FrameRate::from_mtc_code(code)
      .ok_or_else(|| TimecodeError::Parse(format!("MTC rate code {}", code)))
      .and_then(|rate| Timecode::new(hours, minutes, seconds, frames, rate));
    Some(result)
  }
}
