use kiro_midi_core::UInt4;

use crate::protocol::codec::{ump_type_and_group, CodecError, Malformed, MTYPE_UTILITY};
use crate::protocol::messages::utility::Utility;

pub fn encode_ump(utility: &Utility, group: UInt4) -> u32 {
  let data = match *utility {
    Utility::NoOp => 0,
    Utility::JrClock(time) | Utility::JrTimestamp(time) => time as u32,
  };
  ump_type_and_group(MTYPE_UTILITY, group) | (utility.status() as u32) << 20 | data
}

pub fn decode_ump(word: u32) -> Result<Utility, CodecError> {
  let status = ((word >> 20) & 0x0f) as u8;
  let data = (word & 0xffff) as u16;
  match status {
    0b0000 => Ok(Utility::NoOp),
    0b0001 => Ok(Utility::JrClock(data)),
    0b0010 => Ok(Utility::JrTimestamp(data)),
    _ => Err(Malformed::Status(status).into()),
  }
}
