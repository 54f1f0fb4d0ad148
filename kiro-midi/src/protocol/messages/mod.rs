pub mod channel_voice;
pub mod system_common;
pub mod system_exclusive;
pub mod utility;

use crate::protocol::messages::channel_voice::ChannelVoice;
use crate::protocol::messages::system_common::{SystemCommon, SystemRealTime};
use crate::protocol::messages::system_exclusive::SystemExclusive;
use crate::protocol::messages::utility::Utility;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Message {
  Utility(Utility),
  SystemCommon(SystemCommon),
  SystemRealTime(SystemRealTime),
  SystemExclusive(SystemExclusive),
  ChannelVoice(ChannelVoice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Utility,
  SystemCommon,
  SystemRealTime,
  SystemExclusive,
  ChannelVoice,
}

impl Category {
  pub const ALL: [Category; 5] = [
    Category::Utility,
    Category::SystemCommon,
    Category::SystemRealTime,
    Category::SystemExclusive,
    Category::ChannelVoice,
  ];

  pub(crate) fn mask(self) -> u8 {
    1 << self as u8
  }
}

impl Message {
  pub fn category(&self) -> Category {
    match self {
      Message::Utility(_) => Category::Utility,
      Message::SystemCommon(_) => Category::SystemCommon,
      Message::SystemRealTime(_) => Category::SystemRealTime,
      Message::SystemExclusive(_) => Category::SystemExclusive,
      Message::ChannelVoice(_) => Category::ChannelVoice,
    }
  }
}

impl From<ChannelVoice> for Message {
  fn from(message: ChannelVoice) -> Self {
    Message::ChannelVoice(message)
  }
}

impl From<SystemCommon> for Message {
  fn from(message: SystemCommon) -> Self {
    Message::SystemCommon(message)
  }
}

impl From<SystemRealTime> for Message {
  fn from(message: SystemRealTime) -> Self {
    Message::SystemRealTime(message)
  }
}

impl From<SystemExclusive> for Message {
  fn from(message: SystemExclusive) -> Self {
    Message::SystemExclusive(message)
  }
}

impl From<Utility> for Message {
  fn from(message: Utility) -> Self {
    Message::Utility(message)
  }
}
