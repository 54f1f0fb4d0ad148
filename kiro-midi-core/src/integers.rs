use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
  #[error("Integer underflowed its range")]
  Underflow,

  #[error("Integer overflowed its range")]
  Overflow,
}

macro_rules! constrained_integer {
  ($(#[$meta:meta])* $name:ident, $storage:ty, $bits:expr) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $name($storage);

    impl $name {
      pub const BIT_WIDTH: u32 = $bits;
      pub const MIN: Self = Self(0);
      pub const MAX: Self = Self(((1u32 << $bits) - 1) as $storage);
      pub const MIDPOINT: Self = Self((1u32 << ($bits - 1)) as $storage);

      pub fn new<T>(value: T) -> Result<Self, RangeError>
      where
        T: Into<i128>,
      {
        let value = value.into();
        if value < 0 {
          Err(RangeError::Underflow)
        } else if value > Self::MAX.0 as i128 {
          Err(RangeError::Overflow)
        } else {
          Ok(Self(value as $storage))
        }
      }

      /// Validates the range first, then drops the fractional part.
      pub fn from_f64(value: f64) -> Result<Self, RangeError> {
        if value.is_nan() || value < 0.0 {
          Err(RangeError::Underflow)
        } else if value > Self::MAX.0 as f64 {
          Err(RangeError::Overflow)
        } else {
          Ok(Self(value as $storage))
        }
      }

      /// For constants: evaluation fails when `value` is out of range.
      pub const fn constant(value: $storage) -> Self {
        assert!(value <= Self::MAX.0);
        Self(value)
      }

      /// Saturates at the bounds instead of failing.
      pub fn clamped<T>(value: T) -> Self
      where
        T: Into<i128>,
      {
        let value = value.into().clamp(0, Self::MAX.0 as i128);
        Self(value as $storage)
      }

      #[inline]
      pub const fn value(self) -> $storage {
        self.0
      }

      #[inline]
      pub const fn to_widest(self) -> u32 {
        self.0 as u32
      }

      pub fn checked_add(self, rhs: Self) -> Result<Self, RangeError> {
        Self::new(self.0 as i128 + rhs.0 as i128)
      }

      pub fn checked_sub(self, rhs: Self) -> Result<Self, RangeError> {
        Self::new(self.0 as i128 - rhs.0 as i128)
      }
    }

    impl Display for $name {
      fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl From<$name> for $storage {
      fn from(value: $name) -> Self {
        value.0
      }
    }

    constrained_integer!(@try_from $name, u8, u16, u32, u64, i8, i16, i32, i64);

    impl TryFrom<usize> for $name {
      type Error = RangeError;
      fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value as u64)
      }
    }
  };

  (@try_from $name:ident, $($source:ty),*) => {
    $(
      impl TryFrom<$source> for $name {
        type Error = RangeError;
        fn try_from(value: $source) -> Result<Self, Self::Error> {
          Self::new(value)
        }
      }
    )*
  };
}

constrained_integer!(
  /// 4-bit unsigned integer, used for channels, groups and nibbles.
  UInt4,
  u8,
  4
);

constrained_integer!(
  /// 7-bit unsigned integer, the MIDI 1.0 data byte.
  UInt7,
  u8,
  7
);

constrained_integer!(UInt9, u16, 9);

constrained_integer!(
  /// 14-bit unsigned integer, built from a MIDI 1.0 LSB/MSB pair.
  UInt14,
  u16,
  14
);

impl UInt14 {
  pub fn from_bytes(lsb: UInt7, msb: UInt7) -> Self {
    Self((msb.value() as u16) << 7 | lsb.value() as u16)
  }

  pub fn lsb(self) -> UInt7 {
    UInt7((self.0 & 0x7f) as u8)
  }

  pub fn msb(self) -> UInt7 {
    UInt7((self.0 >> 7) as u8)
  }
}
