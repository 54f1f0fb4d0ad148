use kiro_midi_core::UInt7;
use kiro_time::{FrameRate, Timecode, TimecodeError};

use crate::protocol::messages::system_exclusive::{Manufacturer, SystemExclusive};

const ALL_DEVICES: u8 = 0x7f;
const SUB_ID_TIME_CODE: u8 = 0x01;
const SUB_ID_FULL_MESSAGE: u8 = 0x01;

/// `F0 7F 7F 01 01 hh mm ss ff F7`, with the rate code in bits 5-6 of `hh`.
pub fn full_frame(timecode: &Timecode) -> SystemExclusive {
  let data = [
    ALL_DEVICES,
    SUB_ID_TIME_CODE,
    SUB_ID_FULL_MESSAGE,
    timecode.rate().mtc_code() << 5 | timecode.hours(),
    timecode.minutes(),
    timecode.seconds(),
    timecode.frames(),
  ];
  SystemExclusive::new(
    Manufacturer::REAL_TIME,
    data.into_iter().map(UInt7::clamped).collect(),
  )
}

/// `None` when the message is not an MTC full-frame message.
pub fn parse_full_frame(message: &SystemExclusive) -> Option<Result<Timecode, TimecodeError>> {
  if message.manufacturer != Manufacturer::REAL_TIME {
    return None;
  }
  let data = message.data_bytes().collect::<Vec<u8>>();
  match data.as_slice() {
    [_device, SUB_ID_TIME_CODE, SUB_ID_FULL_MESSAGE, hours, minutes, seconds, frames] => {
      let code = (*hours >> 5) & 0x03;
      let result = FrameRate::from_mtc_code(code)
        .ok_or_else(|| TimecodeError::Parse(format!("MTC rate code {}", code)))
        .and_then(|rate| Timecode::new(*hours & 0x1f, *minutes, *seconds, *frames, rate));
      Some(result)
    }
    _ => None,
  }
}
