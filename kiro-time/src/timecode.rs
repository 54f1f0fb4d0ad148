use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::frame_rate::FrameRate;

const DROP_FRAMES_PER_MINUTE: u32 = 30 * 60 - 2;
const DROP_FRAMES_PER_TEN_MINUTES: u32 = DROP_FRAMES_PER_MINUTE * 10 + 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimecodeError {
  #[error("Hours out of range: {0}")]
  Hours(u8),

  #[error("Minutes out of range: {0}")]
  Minutes(u8),

  #[error("Seconds out of range: {0}")]
  Seconds(u8),

  #[error("Frames out of range at {rate} fps: {frames}")]
  Frames { frames: u8, rate: FrameRate },

  #[error("Frame {frames} does not exist at minute {minutes} in drop-frame timecode")]
  DroppedFrame { minutes: u8, frames: u8 },

  #[error("Invalid timecode: {0}")]
  Parse(String),
}

/// An absolute SMPTE position within a 24 hour day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timecode {
  hours: u8,
  minutes: u8,
  seconds: u8,
  frames: u8,
  rate: FrameRate,
}

impl Timecode {
  pub fn new(
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
    rate: FrameRate,
  ) -> Result<Self, TimecodeError> {
    if hours > 23 {
      Err(TimecodeError::Hours(hours))
    } else if minutes > 59 {
      Err(TimecodeError::Minutes(minutes))
    } else if seconds > 59 {
      Err(TimecodeError::Seconds(seconds))
    } else if frames >= rate.frames_per_second() {
      Err(TimecodeError::Frames { frames, rate })
    } else if rate.is_drop_frame() && seconds == 0 && minutes % 10 != 0 && frames < 2 {
      Err(TimecodeError::DroppedFrame { minutes, frames })
    } else {
      Ok(Self {
        hours,
        minutes,
        seconds,
        frames,
        rate,
      })
    }
  }

  pub fn zero(rate: FrameRate) -> Self {
    Self {
      hours: 0,
      minutes: 0,
      seconds: 0,
      frames: 0,
      rate,
    }
  }

  /// Parses `hh:mm:ss:ff`, also accepting `;` as the frames separator.
  pub fn parse(text: &str, rate: FrameRate) -> Result<Self, TimecodeError> {
    let fields = text
      .trim()
      .split(|c| c == ':' || c == ';')
      .map(|field| field.parse::<u8>())
      .collect::<Result<Vec<u8>, _>>()
      .map_err(|_| TimecodeError::Parse(text.to_string()))?;

    match fields.as_slice() {
      [hours, minutes, seconds, frames] => Self::new(*hours, *minutes, *seconds, *frames, rate),
      _ => Err(TimecodeError::Parse(text.to_string())),
    }
  }

  #[inline]
  pub fn hours(&self) -> u8 {
    self.hours
  }

  #[inline]
  pub fn minutes(&self) -> u8 {
    self.minutes
  }

  #[inline]
  pub fn seconds(&self) -> u8 {
    self.seconds
  }

  #[inline]
  pub fn frames(&self) -> u8 {
    self.frames
  }

  #[inline]
  pub fn rate(&self) -> FrameRate {
    self.rate
  }

  /// Same position labels at another rate, validated against it.
  pub fn with_rate(self, rate: FrameRate) -> Result<Self, TimecodeError> {
    Self::new(self.hours, self.minutes, self.seconds, self.frames, rate)
  }

  /// Number of frames elapsed since `00:00:00:00`.
  pub fn to_frame_count(&self) -> u32 {
    let fps = self.rate.frames_per_second() as u32;
    let total_minutes = 60 * self.hours as u32 + self.minutes as u32;
    let total_seconds = 60 * total_minutes + self.seconds as u32;
    let count = total_seconds * fps + self.frames as u32;
    if self.rate.is_drop_frame() {
      count - 2 * (total_minutes - total_minutes / 10)
    } else {
      count
    }
  }

  /// Inverse of [`Timecode::to_frame_count`], wrapping at 24 hours.
  pub fn from_frame_count(count: u32, rate: FrameRate) -> Self {
    let count = count % rate.frames_per_day();
    let fps = rate.frames_per_second() as u32;
    let labels = if rate.is_drop_frame() {
      let tens = count / DROP_FRAMES_PER_TEN_MINUTES;
      let remainder = count % DROP_FRAMES_PER_TEN_MINUTES;
      let skipped = if remainder > 1 {
        2 * ((remainder - 2) / DROP_FRAMES_PER_MINUTE)
      } else {
        0
      };
      count + 18 * tens + skipped
    } else {
      count
    };

    Self {
      hours: (labels / (fps * 3600) % 24) as u8,
      minutes: (labels / (fps * 60) % 60) as u8,
      seconds: (labels / fps % 60) as u8,
      frames: (labels % fps) as u8,
      rate,
    }
  }

  /// Moves by a signed number of frames, wrapping around midnight.
  pub fn offset(self, frames: i64) -> Self {
    let frames_per_day = self.rate.frames_per_day() as i64;
    let count = (self.to_frame_count() as i64 + frames).rem_euclid(frames_per_day);
    Self::from_frame_count(count as u32, self.rate)
  }

  pub fn next_frame(self) -> Self {
    self.offset(1)
  }

  pub fn previous_frame(self) -> Self {
    self.offset(-1)
  }
}

impl Display for Timecode {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let separator = if self.rate.is_drop_frame() { ';' } else { ':' };
    write!(
      f,
      "{:02}:{:02}:{:02}{}{:02}",
      self.hours, self.minutes, self.seconds, separator, self.frames
    )
  }
}
