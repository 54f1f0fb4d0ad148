use kiro_midi_core::UInt7;

use crate::protocol::codec::{data_byte, CodecError, Encoding, Malformed};
use crate::protocol::messages::system_exclusive::{Manufacturer, SystemExclusive};

pub const SYSEX_START: u8 = 0xf0;
pub const SYSEX_END: u8 = 0xf7;

pub fn encode_midi1(system_exclusive: &SystemExclusive) -> Result<Vec<u8>, CodecError> {
  let mut bytes = Vec::with_capacity(system_exclusive.data.len() + 5);
  bytes.push(SYSEX_START);
  match system_exclusive.manufacturer {
    Manufacturer::OneByte(id) if id == UInt7::MIN => {
      return Err(CodecError::NotRepresentable(Encoding::Midi1Bytes))
    }
    Manufacturer::OneByte(id) => bytes.push(id.value()),
    Manufacturer::ThreeByte(msb, lsb) => bytes.extend([0x00, msb.value(), lsb.value()]),
  }
  bytes.extend(system_exclusive.data_bytes());
  bytes.push(SYSEX_END);
  Ok(bytes)
}

pub fn decode_midi1(bytes: &[u8]) -> Result<SystemExclusive, CodecError> {
  let body = match bytes {
    [SYSEX_START, body @ .., SYSEX_END] => body,
    _ => return Err(Malformed::MissingTerminator.into()),
  };
  let body = body
    .iter()
    .map(|byte| data_byte(*byte))
    .collect::<Result<Vec<UInt7>, CodecError>>()?;

  match body.as_slice() {
    [] => Err(
      Malformed::Truncated {
        expected: 3,
        found: bytes.len(),
      }
      .into(),
    ),
    [id, data @ ..] if *id != UInt7::MIN => Ok(SystemExclusive::new(
      Manufacturer::OneByte(*id),
      data.to_vec(),
    )),
    [_, msb, lsb, data @ ..] => Ok(SystemExclusive::new(
      Manufacturer::ThreeByte(*msb, *lsb),
      data.to_vec(),
    )),
    _ => Err(
      Malformed::Truncated {
        expected: 5,
        found: bytes.len(),
      }
      .into(),
    ),
  }
}
