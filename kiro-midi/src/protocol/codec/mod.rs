//! Stateless translation between typed events and their wire encodings:
//! MIDI 1.0 byte messages and Universal MIDI Packet (UMP) words.

pub(crate) mod channel_voice;
pub(crate) mod system_common;
pub(crate) mod system_exclusive;
pub(crate) mod utility;

use std::fmt::{Display, Formatter};

use thiserror::Error;

use kiro_midi_core::{UInt4, UInt7};

use crate::event::Event;
use crate::protocol::messages::Message;

pub const MTYPE_UTILITY: u8 = 0x0;
pub const MTYPE_SYSTEM: u8 = 0x1;
pub const MTYPE_MIDI1_CHANNEL_VOICE: u8 = 0x2;
pub const MTYPE_DATA64: u8 = 0x3;
pub const MTYPE_MIDI2_CHANNEL_VOICE: u8 = 0x4;
pub const MTYPE_DATA128: u8 = 0x5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
  Midi1,
  Midi2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
  Midi1Bytes,
  Ump(ProtocolVersion),
  UmpData,
}

impl Display for Encoding {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Encoding::Midi1Bytes => write!(f, "MIDI 1.0 bytes"),
      Encoding::Ump(ProtocolVersion::Midi1) => write!(f, "UMP (MIDI 1.0 protocol)"),
      Encoding::Ump(ProtocolVersion::Midi2) => write!(f, "UMP (MIDI 2.0 protocol)"),
      Encoding::UmpData => write!(f, "UMP data packets"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformed {
  #[error("Empty message")]
  Empty,

  #[error("Truncated message: expected {expected} found {found}")]
  Truncated { expected: usize, found: usize },

  #[error("Over-long message: expected {expected} found {found}")]
  Overlong { expected: usize, found: usize },

  #[error("Data byte with the high bit set: 0x{0:02x}")]
  DataByte(u8),

  #[error("Unrecognized status: 0x{0:02x}")]
  Status(u8),

  #[error("Missing System Exclusive terminator")]
  MissingTerminator,

  #[error("Unrecognized UMP message type: 0x{0:x}")]
  MessageType(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
  #[error("Malformed message: {0}")]
  MalformedMessage(#[from] Malformed),

  #[error("No encoding defined for {0}")]
  NotRepresentable(Encoding),
}

/// Number of words of a UMP packet, given its message type.
pub fn ump_len(mtype: u8) -> usize {
  match mtype & 0x0f {
    0x0 | 0x1 | 0x2 | 0x6 | 0x7 => 1,
    0x3 | 0x4 | 0x8 | 0x9 | 0xa => 2,
    0xb | 0xc => 3,
    _ => 4,
  }
}

impl Event {
  pub fn to_midi1_bytes(&self) -> Result<Vec<u8>, CodecError> {
    match &self.message {
      Message::ChannelVoice(message) => Ok(channel_voice::encode_midi1(message)),
      Message::SystemCommon(message) => Ok(system_common::encode_midi1(message)),
      Message::SystemRealTime(message) => Ok(vec![message.status()]),
      Message::SystemExclusive(message) => system_exclusive::encode_midi1(message),
      Message::Utility(_) => Err(CodecError::NotRepresentable(Encoding::Midi1Bytes)),
    }
  }

  pub fn to_ump_words(&self, protocol: ProtocolVersion) -> Result<Vec<u32>, CodecError> {
    match &self.message {
      Message::ChannelVoice(message) => match protocol {
        ProtocolVersion::Midi1 => Ok(vec![channel_voice::encode_ump_midi1(message, self.group)]),
        ProtocolVersion::Midi2 => Ok(channel_voice::encode_ump_midi2(message, self.group).to_vec()),
      },
      Message::SystemCommon(message) => Ok(vec![system_common::encode_ump(message, self.group)]),
      Message::SystemRealTime(message) => Ok(vec![system_common::encode_ump_real_time(
        message, self.group,
      )]),
      Message::SystemExclusive(_) => Err(CodecError::NotRepresentable(Encoding::Ump(protocol))),
      Message::Utility(message) => Ok(vec![utility::encode_ump(message, self.group)]),
    }
  }

  /// Decodes one complete MIDI 1.0 message. The group is always 0.
  pub fn from_midi1_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
    let status = *bytes.first().ok_or(Malformed::Empty)?;
    let message = match status {
      0x80..=0xef => Message::ChannelVoice(channel_voice::decode_midi1(bytes)?),
      0xf0 => Message::SystemExclusive(system_exclusive::decode_midi1(bytes)?),
      0xf1..=0xf7 => Message::SystemCommon(system_common::decode_midi1(bytes)?),
      0xf8..=0xff => Message::SystemRealTime(system_common::decode_midi1_real_time(bytes)?),
      _ => return Err(Malformed::Status(status).into()),
    };
    Ok(Event::new(UInt4::MIN, message))
  }

  /// Decodes one complete UMP packet.
  pub fn from_ump_words(words: &[u32]) -> Result<Self, CodecError> {
    let first = *words.first().ok_or(Malformed::Empty)?;
    let (mtype, group) = ump_type_and_group_of(first);
    check_len(words.len(), ump_len(mtype))?;
    let message = match mtype {
      MTYPE_UTILITY => Message::Utility(utility::decode_ump(first)?),
      MTYPE_SYSTEM => system_common::decode_ump(first)?,
      MTYPE_MIDI1_CHANNEL_VOICE => Message::ChannelVoice(channel_voice::decode_ump_midi1(first)?),
      MTYPE_MIDI2_CHANNEL_VOICE => {
        Message::ChannelVoice(channel_voice::decode_ump_midi2(first, words[1])?)
      }
      MTYPE_DATA64 | MTYPE_DATA128 => return Err(CodecError::NotRepresentable(Encoding::UmpData)),
      _ => return Err(Malformed::MessageType(mtype).into()),
    };
    Ok(Event::new(group, message))
  }
}

pub(crate) fn check_len(found: usize, expected: usize) -> Result<(), CodecError> {
  if found < expected {
    Err(Malformed::Truncated { expected, found }.into())
  } else if found > expected {
    Err(Malformed::Overlong { expected, found }.into())
  } else {
    Ok(())
  }
}

#[inline]
pub(crate) fn data_byte(byte: u8) -> Result<UInt7, CodecError> {
  UInt7::new(byte).map_err(|_| Malformed::DataByte(byte).into())
}

#[inline]
pub(crate) fn ump_type_and_group(mtype: u8, group: UInt4) -> u32 {
  ump_byte((mtype & 0x0f) << 4 | group.value(), 24)
}

#[inline]
pub(crate) fn ump_byte(value: u8, shift: u8) -> u32 {
  (value as u32) << shift
}

#[inline]
pub(crate) fn ump_byte_at(word: u32, shift: u8) -> u8 {
  ((word >> shift) & 0xff) as u8
}

fn ump_type_and_group_of(word: u32) -> (u8, UInt4) {
  let mtype = ((word >> 28) & 0x0f) as u8;
  let group = UInt4::clamped(((word >> 24) & 0x0f) as u8);
  (mtype, group)
}
