use kiro_midi_core::{ChannelVoiceValue, PitchBendValue, UInt4, UInt7, UInt9, Velocity};

/// Channel Voice Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelVoice {
  pub channel: UInt4,
  pub message: ChannelVoiceMessage,
}

impl ChannelVoice {
  pub fn new(channel: UInt4, message: ChannelVoiceMessage) -> Self {
    Self { channel, message }
  }
}

/// Channel Voice message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelVoiceMessage {
  NoteOff {
    note: UInt7,
    velocity: Velocity,
    attribute: NoteAttribute,
  },
  NoteOn {
    note: UInt7,
    velocity: Velocity,
    attribute: NoteAttribute,
  },
  NotePressure {
    note: UInt7,
    amount: ChannelVoiceValue,
  },
  ControlChange {
    controller: UInt7,
    value: ChannelVoiceValue,
  },
  ProgramChange {
    program: UInt7,
  },
  ChannelPressure {
    amount: ChannelVoiceValue,
  },
  PitchBend {
    value: PitchBendValue,
  },
}

impl ChannelVoiceMessage {
  /// Upper nibble of the status byte.
  pub fn status(&self) -> u8 {
    match self {
      Self::NoteOff { .. } => 0x8,
      Self::NoteOn { .. } => 0x9,
      Self::NotePressure { .. } => 0xa,
      Self::ControlChange { .. } => 0xb,
      Self::ProgramChange { .. } => 0xc,
      Self::ChannelPressure { .. } => 0xd,
      Self::PitchBend { .. } => 0xe,
    }
  }
}

/// MIDI 2.0 note attribute, carried by Note On/Off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NoteAttribute {
  #[default]
  None,
  ManufacturerSpecific(u16),
  ProfileSpecific(u16),
  /// Pitch as a 7 bit semitone and a 9 bit fraction.
  Pitch7_9 {
    semitone: UInt7,
    fraction: UInt9,
  },
  Reserved(ReservedAttribute),
}

/// An attribute of a kind not assigned yet, `0x04..=0xff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservedAttribute {
  kind: u8,
  data: u16,
}

impl ReservedAttribute {
  pub const MIN_KIND: u8 = 0x04;

  /// `None` for the kinds that already have a meaning.
  pub fn new(kind: u8, data: u16) -> Option<Self> {
    (kind >= Self::MIN_KIND).then(|| Self { kind, data })
  }

  pub fn kind(&self) -> u8 {
    self.kind
  }

  pub fn data(&self) -> u16 {
    self.data
  }
}

impl NoteAttribute {
  /// Never fails: kinds with a meaning map to their own variant.
  pub fn from_raw(kind: u8, data: u16) -> Self {
    match kind {
      0x00 => Self::None,
      0x01 => Self::ManufacturerSpecific(data),
      0x02 => Self::ProfileSpecific(data),
      0x03 => Self::Pitch7_9 {
        semitone: UInt7::clamped(data >> 9),
        fraction: UInt9::clamped(data & 0x1ff),
      },
      _ => Self::Reserved(ReservedAttribute { kind, data }),
    }
  }

  pub fn to_raw(&self) -> (u8, u16) {
    match *self {
      Self::None => (0x00, 0),
      Self::ManufacturerSpecific(data) => (0x01, data),
      Self::ProfileSpecific(data) => (0x02, data),
      Self::Pitch7_9 { semitone, fraction } => {
        (0x03, (semitone.value() as u16) << 9 | fraction.value())
      }
      Self::Reserved(reserved) => (reserved.kind, reserved.data),
    }
  }
}
