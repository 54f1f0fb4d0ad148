use kiro_midi_core::{ChannelVoiceValue, PitchBendValue, UInt14, UInt4, UInt7, Velocity};

use crate::protocol::codec::{
  check_len, data_byte, ump_byte, ump_byte_at, ump_type_and_group, CodecError, Malformed,
  MTYPE_MIDI1_CHANNEL_VOICE, MTYPE_MIDI2_CHANNEL_VOICE,
};
use crate::protocol::messages::channel_voice::{ChannelVoice, ChannelVoiceMessage, NoteAttribute};

/// Message length in bytes, status included.
#[inline]
fn midi1_len(status: u8) -> usize {
  match status & 0xf0 {
    0xc0 | 0xd0 => 2,
    _ => 3,
  }
}

pub fn encode_midi1(channel_voice: &ChannelVoice) -> Vec<u8> {
  let status = channel_voice.message.status() << 4 | channel_voice.channel.value();
  match channel_voice.message {
    ChannelVoiceMessage::NoteOff { note, velocity, .. }
    | ChannelVoiceMessage::NoteOn { note, velocity, .. } => {
      vec![status, note.value(), velocity.midi1_value().value()]
    }
    ChannelVoiceMessage::NotePressure { note, amount } => {
      vec![status, note.value(), amount.midi1_value().value()]
    }
    ChannelVoiceMessage::ControlChange { controller, value } => {
      vec![status, controller.value(), value.midi1_value().value()]
    }
    ChannelVoiceMessage::ProgramChange { program } => vec![status, program.value()],
    ChannelVoiceMessage::ChannelPressure { amount } => vec![status, amount.midi1_value().value()],
    ChannelVoiceMessage::PitchBend { value } => {
      let value = value.midi1_value();
      vec![status, value.lsb().value(), value.msb().value()]
    }
  }
}

pub fn decode_midi1(bytes: &[u8]) -> Result<ChannelVoice, CodecError> {
  let status = bytes[0];
  check_len(bytes.len(), midi1_len(status))?;
  let channel = UInt4::clamped(status & 0x0f);
  let data0 = data_byte(bytes[1])?;
  let data1 = bytes.get(2).map(|byte| data_byte(*byte)).transpose()?;
  let data1 = data1.unwrap_or(UInt7::MIN);

  let message = match status >> 4 {
    0x8 => ChannelVoiceMessage::NoteOff {
      note: data0,
      velocity: Velocity::Midi1(data1),
      attribute: NoteAttribute::None,
    },
    0x9 => ChannelVoiceMessage::NoteOn {
      note: data0,
      velocity: Velocity::Midi1(data1),
      attribute: NoteAttribute::None,
    },
    0xa => ChannelVoiceMessage::NotePressure {
      note: data0,
      amount: ChannelVoiceValue::Midi1(data1),
    },
    0xb => ChannelVoiceMessage::ControlChange {
      controller: data0,
      value: ChannelVoiceValue::Midi1(data1),
    },
    0xc => ChannelVoiceMessage::ProgramChange { program: data0 },
    0xd => ChannelVoiceMessage::ChannelPressure {
      amount: ChannelVoiceValue::Midi1(data0),
    },
    0xe => ChannelVoiceMessage::PitchBend {
      value: PitchBendValue::Midi1(UInt14::from_bytes(data0, data1)),
    },
    _ => return Err(Malformed::Status(status).into()),
  };

  Ok(ChannelVoice::new(channel, message))
}

pub fn encode_ump_midi1(channel_voice: &ChannelVoice, group: UInt4) -> u32 {
  let bytes = encode_midi1(channel_voice);
  let data_at = |index: usize, shift: u8| ump_byte(bytes.get(index).copied().unwrap_or(0), shift);
  ump_type_and_group(MTYPE_MIDI1_CHANNEL_VOICE, group) | data_at(0, 16) | data_at(1, 8) | data_at(2, 0)
}

pub fn decode_ump_midi1(word: u32) -> Result<ChannelVoice, CodecError> {
  let status = ump_byte_at(word, 16);
  if !(0x80..=0xef).contains(&status) {
    return Err(Malformed::Status(status).into());
  }
  let bytes = [status, ump_byte_at(word, 8), ump_byte_at(word, 0)];
  decode_midi1(&bytes[0..midi1_len(status)])
}

pub fn encode_ump_midi2(channel_voice: &ChannelVoice, group: UInt4) -> [u32; 2] {
  let status = channel_voice.message.status() << 4 | channel_voice.channel.value();
  let head = ump_type_and_group(MTYPE_MIDI2_CHANNEL_VOICE, group) | ump_byte(status, 16);
  match channel_voice.message {
    ChannelVoiceMessage::NoteOff {
      note,
      velocity,
      attribute,
    }
    | ChannelVoiceMessage::NoteOn {
      note,
      velocity,
      attribute,
    } => {
      let (kind, data) = attribute.to_raw();
      [
        head | ump_byte(note.value(), 8) | ump_byte(kind, 0),
        (velocity.midi2_value() as u32) << 16 | data as u32,
      ]
    }
    ChannelVoiceMessage::NotePressure { note, amount } => {
      [head | ump_byte(note.value(), 8), amount.midi2_value()]
    }
    ChannelVoiceMessage::ControlChange { controller, value } => {
      [head | ump_byte(controller.value(), 8), value.midi2_value()]
    }
    ChannelVoiceMessage::ProgramChange { program } => [head, ump_byte(program.value(), 24)],
    ChannelVoiceMessage::ChannelPressure { amount } => [head, amount.midi2_value()],
    ChannelVoiceMessage::PitchBend { value } => [head, value.midi2_value()],
  }
}

pub fn decode_ump_midi2(word0: u32, word1: u32) -> Result<ChannelVoice, CodecError> {
  let status = ump_byte_at(word0, 16);
  let channel = UInt4::clamped(status & 0x0f);
  let index = ump_byte_at(word0, 8);

  let message = match status >> 4 {
    0x8 => ChannelVoiceMessage::NoteOff {
      note: data_byte(index)?,
      velocity: Velocity::Midi2((word1 >> 16) as u16),
      attribute: NoteAttribute::from_raw(ump_byte_at(word0, 0), (word1 & 0xffff) as u16),
    },
    0x9 => ChannelVoiceMessage::NoteOn {
      note: data_byte(index)?,
      velocity: Velocity::Midi2((word1 >> 16) as u16),
      attribute: NoteAttribute::from_raw(ump_byte_at(word0, 0), (word1 & 0xffff) as u16),
    },
    0xa => ChannelVoiceMessage::NotePressure {
      note: data_byte(index)?,
      amount: ChannelVoiceValue::Midi2(word1),
    },
    0xb => ChannelVoiceMessage::ControlChange {
      controller: data_byte(index)?,
      value: ChannelVoiceValue::Midi2(word1),
    },
    // Bank fields are not modelled, only the program is kept.
    0xc => ChannelVoiceMessage::ProgramChange {
      program: data_byte(ump_byte_at(word1, 24))?,
    },
    0xd => ChannelVoiceMessage::ChannelPressure {
      amount: ChannelVoiceValue::Midi2(word1),
    },
    0xe => ChannelVoiceMessage::PitchBend {
      value: PitchBendValue::Midi2(word1),
    },
    _ => return Err(Malformed::Status(status).into()),
  };

  Ok(ChannelVoice::new(channel, message))
}

#[cfg(test)]
mod tests {
  use assert_approx_eq::assert_approx_eq;

  use super::*;
  use crate::protocol::messages::channel_voice::ReservedAttribute;

  fn uint4(value: u8) -> UInt4 {
    UInt4::new(value).unwrap()
  }

  fn uint7(value: u8) -> UInt7 {
    UInt7::new(value).unwrap()
  }

  fn note_on(note: u8, velocity: Velocity, attribute: NoteAttribute) -> ChannelVoice {
    ChannelVoice::new(
      uint4(2),
      ChannelVoiceMessage::NoteOn {
        note: uint7(note),
        velocity,
        attribute,
      },
    )
  }

  #[test]
  fn encode_midi1_messages() {
    let test_cases = vec![
      (
        note_on(0x3c, Velocity::Midi1(uint7(0x64)), NoteAttribute::None),
        vec![0x92, 0x3c, 0x64],
      ),
      (
        note_on(0x3c, Velocity::Midi2(0xffff), NoteAttribute::ProfileSpecific(1)),
        vec![0x92, 0x3c, 0x7f],
      ),
      (
        ChannelVoice::new(
          uint4(0),
          ChannelVoiceMessage::ControlChange {
            controller: uint7(0x07),
            value: ChannelVoiceValue::UnitInterval(0.5),
          },
        ),
        vec![0xb0, 0x07, 0x40],
      ),
      (
        ChannelVoice::new(uint4(15), ChannelVoiceMessage::ProgramChange { program: uint7(5) }),
        vec![0xcf, 0x05],
      ),
      (
        ChannelVoice::new(
          uint4(1),
          ChannelVoiceMessage::PitchBend {
            value: PitchBendValue::CENTER,
          },
        ),
        vec![0xe1, 0x00, 0x40],
      ),
    ];

    for (message, expected) in test_cases {
      assert_eq!(encode_midi1(&message), expected, "{:?}", message);
    }
  }

  #[test]
  fn decode_midi1_keeps_note_on_with_zero_velocity() {
    let result = decode_midi1(&[0x92, 0x3c, 0x00]);
    assert!(
      matches!(
        result,
        Ok(ChannelVoice {
          message: ChannelVoiceMessage::NoteOn { .. },
          ..
        })
      ),
      "Unexpected result: {:?}",
      result
    );
  }

  #[test]
  fn decode_midi1_unit_interval() {
    let result = decode_midi1(&[0xb3, 0x01, 0x7f]).expect("decode");
    match result.message {
      ChannelVoiceMessage::ControlChange { value, .. } => {
        assert_approx_eq!(value.unit_interval_value(), 1.0)
      }
      message => panic!("Unexpected message: {:?}", message),
    }
  }

  #[test]
  fn encode_ump_midi1_word() {
    let message = note_on(0x3c, Velocity::Midi1(uint7(0x40)), NoteAttribute::None);
    assert_eq!(encode_ump_midi1(&message, uint4(1)), 0x21923c40);

    let program = ChannelVoice::new(uint4(3), ChannelVoiceMessage::ProgramChange { program: uint7(9) });
    assert_eq!(encode_ump_midi1(&program, uint4(0)), 0x20c30900);
  }

  #[test]
  fn decode_ump_midi1_word() {
    assert_eq!(
      decode_ump_midi1(0x21923c40),
      Ok(note_on(0x3c, Velocity::Midi1(uint7(0x40)), NoteAttribute::None))
    );
    assert_eq!(
      decode_ump_midi1(0x20f80000),
      Err(Malformed::Status(0xf8).into())
    );
  }

  #[test]
  fn decode_note_off() {
    assert_eq!(
      decode_ump_midi2(0x4182bc03, 0xabcd1234).map(|message| message.message),
      Err(Malformed::DataByte(0xbc).into())
    );

    assert_eq!(
      decode_ump_midi2(0x41823c03, 0xabcd1234),
      Ok(ChannelVoice {
        channel: uint4(2),
        message: ChannelVoiceMessage::NoteOff {
          note: uint7(0x3c),
          velocity: Velocity::Midi2(0xabcd),
          attribute: NoteAttribute::from_raw(0x03, 0x1234),
        }
      })
    );
  }

  #[test]
  fn decode_note_on() {
    assert_eq!(
      decode_ump_midi2(0x41923c01, 0xabcd1234),
      Ok(note_on(
        0x3c,
        Velocity::Midi2(0xabcd),
        NoteAttribute::ManufacturerSpecific(0x1234)
      ))
    );
  }

  #[test]
  fn note_attributes_survive_ump() {
    let test_cases = vec![
      NoteAttribute::None,
      NoteAttribute::ProfileSpecific(0x0102),
      NoteAttribute::from_raw(0x03, 0x7e01),
      NoteAttribute::Reserved(ReservedAttribute::new(0x04, 0xbeef).unwrap()),
      NoteAttribute::Reserved(ReservedAttribute::new(0xff, 0x0000).unwrap()),
    ];

    for attribute in test_cases {
      let message = note_on(0x3c, Velocity::Midi2(0x8000), attribute);
      let [word0, word1] = encode_ump_midi2(&message, UInt4::MIN);
      assert_eq!(decode_ump_midi2(word0, word1), Ok(message), "{:?}", attribute);
    }
  }

  #[test]
  fn decode_note_pressure() {
    assert_eq!(
      decode_ump_midi2(0x41a23c00, 0x12345678),
      Ok(ChannelVoice {
        channel: uint4(2),
        message: ChannelVoiceMessage::NotePressure {
          note: uint7(0x3c),
          amount: ChannelVoiceValue::Midi2(0x12345678),
        }
      })
    );
  }

  #[test]
  fn decode_control_change() {
    assert_eq!(
      decode_ump_midi2(0x41b27700, 0x12345678),
      Ok(ChannelVoice {
        channel: uint4(2),
        message: ChannelVoiceMessage::ControlChange {
          controller: uint7(0x77),
          value: ChannelVoiceValue::Midi2(0x12345678),
        }
      })
    );
  }

  #[test]
  fn decode_program_change() {
    assert_eq!(
      decode_ump_midi2(0x41c20001, 0x7f001234),
      Ok(ChannelVoice {
        channel: uint4(2),
        message: ChannelVoiceMessage::ProgramChange { program: UInt7::MAX }
      })
    );
  }

  #[test]
  fn decode_channel_pressure() {
    assert_eq!(
      decode_ump_midi2(0x41d20000, 0x87654321),
      Ok(ChannelVoice {
        channel: uint4(2),
        message: ChannelVoiceMessage::ChannelPressure {
          amount: ChannelVoiceValue::Midi2(0x87654321)
        }
      })
    );
  }

  #[test]
  fn decode_pitch_bend() {
    assert_eq!(
      decode_ump_midi2(0x41e20000, 0x87654321),
      Ok(ChannelVoice {
        channel: uint4(2),
        message: ChannelVoiceMessage::PitchBend {
          value: PitchBendValue::Midi2(0x87654321)
        }
      })
    );
  }

  #[test]
  fn decode_unsupported_status() {
    let test_cases = vec![0x41023ca5, 0x41123ca5, 0x41223ca5, 0x41623c00, 0x41f23c00];
    for word0 in test_cases {
      let result = decode_ump_midi2(word0, 0x12345678);
      assert!(
        matches!(result, Err(CodecError::MalformedMessage(Malformed::Status(_)))),
        "Unexpected result: {:?}",
        result
      );
    }
  }

  #[test]
  fn encode_ump_midi2_words() {
    let test_cases = vec![
      (
        note_on(0x3c, Velocity::Midi1(UInt7::MAX), NoteAttribute::None),
        [0x40923c00, 0xffff0000],
      ),
      (
        ChannelVoice::new(
          uint4(2),
          ChannelVoiceMessage::ControlChange {
            controller: uint7(0x77),
            value: ChannelVoiceValue::Midi2(0x12345678),
          },
        ),
        [0x40b27700, 0x12345678],
      ),
      (
        ChannelVoice::new(uint4(2), ChannelVoiceMessage::ProgramChange { program: uint7(0x41) }),
        [0x40c20000, 0x41000000],
      ),
      (
        ChannelVoice::new(
          uint4(2),
          ChannelVoiceMessage::PitchBend {
            value: PitchBendValue::CENTER,
          },
        ),
        [0x40e20000, 0x80000000],
      ),
    ];

    for (message, expected) in test_cases {
      assert_eq!(encode_ump_midi2(&message, UInt4::MIN), expected, "{:?}", message);
    }
  }
}
