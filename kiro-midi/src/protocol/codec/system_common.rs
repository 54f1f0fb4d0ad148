use kiro_midi_core::{UInt14, UInt4, UInt7};

use crate::protocol::codec::{
  check_len, data_byte, ump_byte, ump_byte_at, ump_type_and_group, CodecError, Malformed,
  MTYPE_SYSTEM,
};
use crate::protocol::messages::system_common::{MidiTimeCode, SystemCommon, SystemRealTime};
use crate::protocol::messages::Message;

/// Message length in bytes for a system common status, status included.
pub(crate) fn midi1_len(status: u8) -> Option<usize> {
  match status {
    0xf1 | 0xf3 => Some(2),
    0xf2 => Some(3),
    0xf6 => Some(1),
    _ => None,
  }
}

pub fn encode_midi1(system_common: &SystemCommon) -> Vec<u8> {
  let status = system_common.status();
  match *system_common {
    SystemCommon::MidiTimeCode(code) => vec![status, code.to_data_byte().value()],
    SystemCommon::SongPositionPointer(position) => {
      vec![status, position.lsb().value(), position.msb().value()]
    }
    SystemCommon::SongSelect(song) => vec![status, song.value()],
    SystemCommon::TuneRequest => vec![status],
  }
}

pub fn decode_midi1(bytes: &[u8]) -> Result<SystemCommon, CodecError> {
  let status = bytes[0];
  let len = midi1_len(status).ok_or(Malformed::Status(status))?;
  check_len(bytes.len(), len)?;
  let data = bytes[1..]
    .iter()
    .map(|byte| data_byte(*byte))
    .collect::<Result<Vec<UInt7>, CodecError>>()?;

  match (status, data.as_slice()) {
    (0xf1, [data0]) => Ok(SystemCommon::MidiTimeCode(MidiTimeCode::from_data_byte(*data0))),
    (0xf2, [lsb, msb]) => Ok(SystemCommon::SongPositionPointer(UInt14::from_bytes(*lsb, *msb))),
    (0xf3, [song]) => Ok(SystemCommon::SongSelect(*song)),
    (0xf6, []) => Ok(SystemCommon::TuneRequest),
    _ => Err(Malformed::Status(status).into()),
  }
}

pub fn decode_midi1_real_time(bytes: &[u8]) -> Result<SystemRealTime, CodecError> {
  let status = bytes[0];
  let message = SystemRealTime::from_status(status).ok_or(Malformed::Status(status))?;
  check_len(bytes.len(), 1)?;
  Ok(message)
}

pub fn encode_ump(system_common: &SystemCommon, group: UInt4) -> u32 {
  let bytes = encode_midi1(system_common);
  let data_at = |index: usize, shift: u8| ump_byte(bytes.get(index).copied().unwrap_or(0), shift);
  ump_type_and_group(MTYPE_SYSTEM, group) | data_at(0, 16) | data_at(1, 8) | data_at(2, 0)
}

pub fn encode_ump_real_time(system_real_time: &SystemRealTime, group: UInt4) -> u32 {
  ump_type_and_group(MTYPE_SYSTEM, group) | ump_byte(system_real_time.status(), 16)
}

pub fn decode_ump(word: u32) -> Result<Message, CodecError> {
  let status = ump_byte_at(word, 16);
  if let Some(message) = SystemRealTime::from_status(status) {
    Ok(Message::SystemRealTime(message))
  } else {
    let len = midi1_len(status).ok_or(Malformed::Status(status))?;
    let bytes = [status, ump_byte_at(word, 8), ump_byte_at(word, 0)];
    decode_midi1(&bytes[0..len]).map(Message::SystemCommon)
  }
}
