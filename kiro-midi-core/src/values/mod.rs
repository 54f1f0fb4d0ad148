//! Channel voice values that can be authored at any resolution.
//!
//! Every value type holds one of three representations: a protocol agnostic
//! unit interval, the MIDI 1.0 magnitude or the MIDI 2.0 magnitude. Conversions
//! between them follow one scaling law, and equality across representations is
//! defined through that law at the MIDI 2.0 magnitude.

mod scaling;
mod validated;

use std::hash::{Hash, Hasher};

use crate::integers::{UInt14, UInt7};
use crate::values::scaling::{clamp_unit, rescale, scale_to_unit, unit_to_scale};

pub use crate::values::validated::Validated;

pub trait ScaledValue: Copy {
  /// Returns the value with any unit interval clamped to `[0, 1]`.
  fn saturated(self) -> Self;
}

macro_rules! scaled_value {
  ($(#[$meta:meta])* $name:ident, $midi1:ty, $midi2:ty) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy)]
    pub enum $name {
      UnitInterval(f64),
      Midi1($midi1),
      Midi2($midi2),
    }

    impl $name {
      const MIDI1_MAX: u64 = <$midi1>::MAX.to_widest() as u64;
      const MIDI2_MAX: u64 = <$midi2>::MAX as u64;

      pub fn unit_interval_value(&self) -> f64 {
        match *self {
          Self::UnitInterval(value) => clamp_unit(value),
          Self::Midi1(value) => scale_to_unit(value.to_widest() as u64, Self::MIDI1_MAX),
          Self::Midi2(value) => scale_to_unit(value as u64, Self::MIDI2_MAX),
        }
      }

      pub fn midi1_value(&self) -> $midi1 {
        match *self {
          Self::UnitInterval(value) => <$midi1>::clamped(unit_to_scale(value, Self::MIDI1_MAX)),
          Self::Midi1(value) => value,
          Self::Midi2(value) => {
            <$midi1>::clamped(rescale(value as u64, Self::MIDI2_MAX, Self::MIDI1_MAX))
          }
        }
      }

      pub fn midi2_value(&self) -> $midi2 {
        match *self {
          Self::UnitInterval(value) => unit_to_scale(value, Self::MIDI2_MAX) as $midi2,
          Self::Midi1(value) => {
            rescale(value.to_widest() as u64, Self::MIDI1_MAX, Self::MIDI2_MAX) as $midi2
          }
          Self::Midi2(value) => value,
        }
      }
    }

    impl ScaledValue for $name {
      fn saturated(self) -> Self {
        match self {
          Self::UnitInterval(value) => Self::UnitInterval(clamp_unit(value)),
          other => other,
        }
      }
    }

    // Compared at the MIDI 2.0 magnitude, the finest one every tag maps onto.
    impl PartialEq for $name {
      fn eq(&self, other: &Self) -> bool {
        match (self, other) {
          (Self::Midi1(lhs), Self::Midi1(rhs)) => lhs == rhs,
          (Self::Midi2(lhs), Self::Midi2(rhs)) => lhs == rhs,
          _ => self.midi2_value() == other.midi2_value(),
        }
      }
    }

    impl Eq for $name {}

    impl Hash for $name {
      fn hash<H: Hasher>(&self, state: &mut H) {
        self.midi2_value().hash(state)
      }
    }

    impl From<$midi1> for $name {
      fn from(value: $midi1) -> Self {
        Self::Midi1(value)
      }
    }

    impl From<$midi2> for $name {
      fn from(value: $midi2) -> Self {
        Self::Midi2(value)
      }
    }

    impl From<f64> for $name {
      fn from(value: f64) -> Self {
        Self::UnitInterval(value)
      }
    }
  };
}

scaled_value!(
  /// 7-bit (MIDI 1.0) / 32-bit (MIDI 2.0) value used by controllers and pressure.
  ChannelVoiceValue,
  UInt7,
  u32
);

scaled_value!(
  /// Note velocity: 7-bit (MIDI 1.0) / 16-bit (MIDI 2.0).
  Velocity,
  UInt7,
  u16
);

scaled_value!(
  /// Pitch bend: 14-bit (MIDI 1.0) / 32-bit (MIDI 2.0), centered at the midpoint.
  PitchBendValue,
  UInt14,
  u32
);

impl PitchBendValue {
  pub const CENTER: Self = Self::Midi2(0x8000_0000);
}

#[cfg(test)]
mod tests {
  use std::collections::hash_map::DefaultHasher;

  use assert_approx_eq::assert_approx_eq;

  use super::*;

  fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
  }

  fn uint7(value: u8) -> UInt7 {
    UInt7::new(value).unwrap()
  }

  #[test]
  fn unit_interval_value() {
    assert_approx_eq!(ChannelVoiceValue::UnitInterval(0.3).unit_interval_value(), 0.3);
    assert_approx_eq!(ChannelVoiceValue::UnitInterval(-2.0).unit_interval_value(), 0.0);
    assert_approx_eq!(ChannelVoiceValue::UnitInterval(1.5).unit_interval_value(), 1.0);
    assert_approx_eq!(ChannelVoiceValue::UnitInterval(f64::NAN).unit_interval_value(), 0.0);
    assert_approx_eq!(ChannelVoiceValue::Midi1(uint7(127)).unit_interval_value(), 1.0);
    assert_approx_eq!(ChannelVoiceValue::Midi1(uint7(0)).unit_interval_value(), 0.0);
    assert_approx_eq!(ChannelVoiceValue::Midi2(u32::MAX).unit_interval_value(), 1.0);
  }

  #[test]
  fn midi1_value() {
    let test_cases = vec![
      (ChannelVoiceValue::UnitInterval(0.0), 0),
      (ChannelVoiceValue::UnitInterval(0.5), 64),
      (ChannelVoiceValue::UnitInterval(1.0), 127),
      (ChannelVoiceValue::UnitInterval(3.0), 127),
      (ChannelVoiceValue::Midi1(uint7(42)), 42),
      (ChannelVoiceValue::Midi2(0), 0),
      (ChannelVoiceValue::Midi2(0x8000_0000), 64),
      (ChannelVoiceValue::Midi2(u32::MAX), 127),
    ];

    for (value, expected) in test_cases {
      assert_eq!(value.midi1_value(), uint7(expected), "{:?}", value);
    }
  }

  #[test]
  fn midi2_value() {
    let test_cases = vec![
      (ChannelVoiceValue::UnitInterval(0.0), 0),
      (ChannelVoiceValue::UnitInterval(1.0), u32::MAX),
      (ChannelVoiceValue::Midi1(uint7(0)), 0),
      (ChannelVoiceValue::Midi1(uint7(127)), u32::MAX),
      (ChannelVoiceValue::Midi1(uint7(64)), 2_164_392_968),
      (ChannelVoiceValue::Midi2(12345), 12345),
    ];

    for (value, expected) in test_cases {
      assert_eq!(value.midi2_value(), expected, "{:?}", value);
    }
  }

  #[test]
  fn same_tag_round_trips() {
    for n in 0..=127u8 {
      let value = ChannelVoiceValue::Midi1(uint7(n));
      assert_eq!(ChannelVoiceValue::Midi1(value.midi1_value()), value);
      assert_eq!(ChannelVoiceValue::Midi2(value.midi2_value()).midi1_value(), uint7(n));
    }

    let value = Velocity::Midi2(0xabcd);
    assert_eq!(Velocity::Midi2(value.midi2_value()), value);
  }

  #[test]
  fn cross_tag_equality() {
    let unit = ChannelVoiceValue::UnitInterval(1.0);
    let midi1 = ChannelVoiceValue::Midi1(uint7(127));
    let midi2 = ChannelVoiceValue::Midi2(u32::MAX);

    assert_eq!(unit, midi1);
    assert_eq!(midi1, unit);
    assert_eq!(unit, midi2);
    assert_eq!(midi2, unit);
    assert_eq!(midi1, midi2);
    assert_eq!(midi2, midi1);

    assert_ne!(ChannelVoiceValue::Midi1(uint7(126)), midi2);
    assert_ne!(ChannelVoiceValue::Midi2(u32::MAX - 1), midi1);
    assert_ne!(
      ChannelVoiceValue::UnitInterval(0.5),
      ChannelVoiceValue::UnitInterval(0.503)
    );
  }

  #[test]
  fn equal_values_hash_equal() {
    let mut values = Vec::new();
    for n in 0..=127u8 {
      let midi1 = ChannelVoiceValue::Midi1(uint7(n));
      values.push(midi1);
      values.push(ChannelVoiceValue::Midi2(midi1.midi2_value()));
      values.push(ChannelVoiceValue::Midi2(midi1.midi2_value().saturating_sub(1)));
      values.push(ChannelVoiceValue::UnitInterval(midi1.unit_interval_value()));
      values.push(ChannelVoiceValue::UnitInterval(n as f64 / 128.0));
    }
    values.push(ChannelVoiceValue::UnitInterval(0.5));
    values.push(ChannelVoiceValue::UnitInterval(0.9645669291338582));

    for lhs in values.iter() {
      for rhs in values.iter() {
        if lhs == rhs {
          assert_eq!(rhs, lhs);
          assert_eq!(hash_of(lhs), hash_of(rhs), "{:?} {:?}", lhs, rhs);
        }
      }
    }
  }

  #[test]
  fn cross_tag_equality_is_transitive() {
    let test_cases = vec![
      ChannelVoiceValue::UnitInterval(0.5),
      ChannelVoiceValue::Midi1(uint7(64)),
      ChannelVoiceValue::Midi2(ChannelVoiceValue::Midi1(uint7(64)).midi2_value()),
      ChannelVoiceValue::UnitInterval(0.9645669291338582),
      ChannelVoiceValue::Midi1(uint7(123)),
      ChannelVoiceValue::Midi2(0x8000_0000),
    ];

    for a in test_cases.iter() {
      for b in test_cases.iter() {
        for c in test_cases.iter() {
          if a == b && b == c {
            assert_eq!(a, c, "{:?} == {:?} == {:?}", a, b, c);
          }
        }
      }
    }

    let midi1 = ChannelVoiceValue::Midi1(uint7(64));
    assert_eq!(midi1, ChannelVoiceValue::Midi2(midi1.midi2_value()));
    assert_eq!(midi1, ChannelVoiceValue::UnitInterval(64.0 / 127.0));
    assert_ne!(midi1, ChannelVoiceValue::UnitInterval(0.5));
  }

  #[test]
  fn velocity_scaling() {
    assert_eq!(Velocity::Midi1(uint7(127)).midi2_value(), u16::MAX);
    assert_eq!(Velocity::Midi2(0x8000).midi1_value(), uint7(64));
    assert_eq!(Velocity::UnitInterval(1.0), Velocity::Midi2(0xffff));
  }

  #[test]
  fn pitch_bend_center() {
    assert_eq!(PitchBendValue::CENTER.midi1_value(), UInt14::MIDPOINT);
    assert_eq!(
      PitchBendValue::Midi1(UInt14::MAX),
      PitchBendValue::UnitInterval(1.0)
    );
  }

  #[test]
  fn saturated_clamps_only_unit_interval() {
    assert!(matches!(
      ChannelVoiceValue::UnitInterval(7.0).saturated(),
      ChannelVoiceValue::UnitInterval(value) if value == 1.0
    ));
    assert!(matches!(
      ChannelVoiceValue::Midi2(9).saturated(),
      ChannelVoiceValue::Midi2(9)
    ));
  }
}
