use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::timecode::TimecodeError;

/// The four SMPTE rates that MIDI Time Code can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRate {
  Fps24,
  Fps25,
  /// 30000/1001 fps, frame numbers 0 and 1 are skipped every minute except every tenth.
  Fps2997Drop,
  Fps30,
}

impl FrameRate {
  pub const ALL: [FrameRate; 4] = [
    FrameRate::Fps24,
    FrameRate::Fps25,
    FrameRate::Fps2997Drop,
    FrameRate::Fps30,
  ];

  /// Nominal frame count per timecode second.
  pub const fn frames_per_second(self) -> u8 {
    match self {
      Self::Fps24 => 24,
      Self::Fps25 => 25,
      Self::Fps2997Drop | Self::Fps30 => 30,
    }
  }

  pub const fn is_drop_frame(self) -> bool {
    matches!(self, Self::Fps2997Drop)
  }

  /// Real frame rate as a `(numerator, denominator)` pair.
  pub const fn ratio(self) -> (u64, u64) {
    match self {
      Self::Fps24 => (24, 1),
      Self::Fps25 => (25, 1),
      Self::Fps2997Drop => (30_000, 1001),
      Self::Fps30 => (30, 1),
    }
  }

  pub fn as_f64(self) -> f64 {
    let (numerator, denominator) = self.ratio();
    numerator as f64 / denominator as f64
  }

  pub const fn frames_per_day(self) -> u32 {
    match self {
      Self::Fps2997Drop => 17_982 * 6 * 24,
      _ => self.frames_per_second() as u32 * 86_400,
    }
  }

  /// The 2-bit rate code carried by MTC messages.
  pub const fn mtc_code(self) -> u8 {
    match self {
      Self::Fps24 => 0,
      Self::Fps25 => 1,
      Self::Fps2997Drop => 2,
      Self::Fps30 => 3,
    }
  }

  pub fn from_mtc_code(code: u8) -> Option<Self> {
    match code {
      0 => Some(Self::Fps24),
      1 => Some(Self::Fps25),
      2 => Some(Self::Fps2997Drop),
      3 => Some(Self::Fps30),
      _ => None,
    }
  }
}

impl Display for FrameRate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Fps24 => write!(f, "24"),
      Self::Fps25 => write!(f, "25"),
      Self::Fps2997Drop => write!(f, "29.97df"),
      Self::Fps30 => write!(f, "30"),
    }
  }
}

impl FromStr for FrameRate {
  type Err = TimecodeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "24" => Ok(Self::Fps24),
      "25" => Ok(Self::Fps25),
      "29.97" | "29.97df" | "2997" => Ok(Self::Fps2997Drop),
      "30" => Ok(Self::Fps30),
      other => Err(TimecodeError::Parse(other.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mtc_codes_round_trip() {
    for rate in FrameRate::ALL {
      assert_eq!(FrameRate::from_mtc_code(rate.mtc_code()), Some(rate));
    }
    assert_eq!(FrameRate::from_mtc_code(4), None);
  }

  #[test]
  fn frames_per_day() {
    assert_eq!(FrameRate::Fps24.frames_per_day(), 2_073_600);
    assert_eq!(FrameRate::Fps30.frames_per_day(), 2_592_000);
    assert_eq!(FrameRate::Fps2997Drop.frames_per_day(), 2_589_408);
  }

  #[test]
  fn parse_and_display() {
    for rate in FrameRate::ALL {
      assert_eq!(rate.to_string().parse::<FrameRate>().ok(), Some(rate));
    }
    assert!(matches!(
      "31".parse::<FrameRate>(),
      Err(TimecodeError::Parse(_))
    ));
  }
}
