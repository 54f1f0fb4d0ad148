use kiro_midi_core::{UInt14, UInt4, UInt7};

/// System Common Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemCommon {
  /// MIDI Time Code
  MidiTimeCode(MidiTimeCode),

  /// Song Position Pointer (14 bits)
  SongPositionPointer(UInt14),

  /// Song Select (7 bits)
  SongSelect(UInt7),

  /// Tune Request
  TuneRequest,
}

impl SystemCommon {
  pub fn status(&self) -> u8 {
    match self {
      Self::MidiTimeCode(_) => 0xf1,
      Self::SongPositionPointer(_) => 0xf2,
      Self::SongSelect(_) => 0xf3,
      Self::TuneRequest => 0xf6,
    }
  }
}

/// System Real Time Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRealTime {
  TimingClock,
  Start,
  Continue,
  Stop,
  ActiveSensing,
  SystemReset,
}

impl SystemRealTime {
  pub fn status(&self) -> u8 {
    match self {
      Self::TimingClock => 0xf8,
      Self::Start => 0xfa,
      Self::Continue => 0xfb,
      Self::Stop => 0xfc,
      Self::ActiveSensing => 0xfe,
      Self::SystemReset => 0xff,
    }
  }

  pub fn from_status(status: u8) -> Option<Self> {
    match status {
      0xf8 => Some(Self::TimingClock),
      0xfa => Some(Self::Start),
      0xfb => Some(Self::Continue),
      0xfc => Some(Self::Stop),
      0xfe => Some(Self::ActiveSensing),
      0xff => Some(Self::SystemReset),
      _ => None,
    }
  }
}

/// One quarter-frame piece: a nibble of the timecode tagged by its piece index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MidiTimeCode {
  FrameLessSignificantNibble(UInt4),
  FrameMostSignificantNibble(UInt4),
  SecondsLessSignificantNibble(UInt4),
  SecondsMostSignificantNibble(UInt4),
  MinutesLessSignificantNibble(UInt4),
  MinutesMostSignificantNibble(UInt4),
  HoursLessSignificantNibble(UInt4),
  HoursMostSignificantNibble(UInt4),
}

impl MidiTimeCode {
  pub fn from_parts(index: u8, nibble: UInt4) -> Option<Self> {
    match index {
      0 => Some(Self::FrameLessSignificantNibble(nibble)),
      1 => Some(Self::FrameMostSignificantNibble(nibble)),
      2 => Some(Self::SecondsLessSignificantNibble(nibble)),
      3 => Some(Self::SecondsMostSignificantNibble(nibble)),
      4 => Some(Self::MinutesLessSignificantNibble(nibble)),
      5 => Some(Self::MinutesMostSignificantNibble(nibble)),
      6 => Some(Self::HoursLessSignificantNibble(nibble)),
      7 => Some(Self::HoursMostSignificantNibble(nibble)),
      _ => None,
    }
  }

  /// Splits the quarter-frame data byte `0nnn dddd`.
  pub fn from_data_byte(data: UInt7) -> Self {
    let nibble = UInt4::clamped(data.value() & 0x0f);
    match data.value() >> 4 {
      0 => Self::FrameLessSignificantNibble(nibble),
      1 => Self::FrameMostSignificantNibble(nibble),
      2 => Self::SecondsLessSignificantNibble(nibble),
      3 => Self::SecondsMostSignificantNibble(nibble),
      4 => Self::MinutesLessSignificantNibble(nibble),
      5 => Self::MinutesMostSignificantNibble(nibble),
      6 => Self::HoursLessSignificantNibble(nibble),
      _ => Self::HoursMostSignificantNibble(nibble),
    }
  }

  pub fn index(&self) -> u8 {
    match self {
      Self::FrameLessSignificantNibble(_) => 0,
      Self::FrameMostSignificantNibble(_) => 1,
      Self::SecondsLessSignificantNibble(_) => 2,
      Self::SecondsMostSignificantNibble(_) => 3,
      Self::MinutesLessSignificantNibble(_) => 4,
      Self::MinutesMostSignificantNibble(_) => 5,
      Self::HoursLessSignificantNibble(_) => 6,
      Self::HoursMostSignificantNibble(_) => 7,
    }
  }

  pub fn nibble(&self) -> UInt4 {
    match *self {
      Self::FrameLessSignificantNibble(nibble)
      | Self::FrameMostSignificantNibble(nibble)
      | Self::SecondsLessSignificantNibble(nibble)
      | Self::SecondsMostSignificantNibble(nibble)
      | Self::MinutesLessSignificantNibble(nibble)
      | Self::MinutesMostSignificantNibble(nibble)
      | Self::HoursLessSignificantNibble(nibble)
      | Self::HoursMostSignificantNibble(nibble) => nibble,
    }
  }

  pub fn to_data_byte(&self) -> UInt7 {
    UInt7::clamped(self.index() << 4 | self.nibble().value())
  }
}
