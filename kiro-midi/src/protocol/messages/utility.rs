#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Utility {
  NoOp,
  /// Jitter reduction clock, in 1/31250 s units.
  JrClock(u16),
  /// Jitter reduction timestamp, in 1/31250 s units.
  JrTimestamp(u16),
}

/// The kind of a [`Utility`] message, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityType {
  NoOp,
  JrClock,
  JrTimestamp,
}

impl UtilityType {
  pub const ALL: [UtilityType; 3] = [
    UtilityType::NoOp,
    UtilityType::JrClock,
    UtilityType::JrTimestamp,
  ];

  pub(crate) fn mask(self) -> u8 {
    1 << self as u8
  }
}

impl Utility {
  pub fn kind(&self) -> UtilityType {
    match self {
      Self::NoOp => UtilityType::NoOp,
      Self::JrClock(_) => UtilityType::JrClock,
      Self::JrTimestamp(_) => UtilityType::JrTimestamp,
    }
  }

  pub fn status(&self) -> u8 {
    match self {
      Self::NoOp => 0b0000,
      Self::JrClock(_) => 0b0001,
      Self::JrTimestamp(_) => 0b0010,
    }
  }
}
