use std::fmt::Formatter;

use kiro_midi_core::{ChannelVoiceValue, PitchBendValue, UInt4, UInt7, Velocity};

use crate::protocol::messages::channel_voice::{ChannelVoice, ChannelVoiceMessage, NoteAttribute};
use crate::protocol::messages::system_common::{MidiTimeCode, SystemCommon, SystemRealTime};
use crate::protocol::messages::system_exclusive::{Manufacturer, SystemExclusive};
use crate::protocol::messages::utility::{Utility, UtilityType};
use crate::protocol::messages::{Category, Message};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Event {
  pub group: UInt4,
  pub message: Message,
}

impl Event {
  pub fn new(group: UInt4, message: Message) -> Self {
    Self { group, message }
  }

  #[must_use]
  pub fn with_group(mut self, group: UInt4) -> Self {
    self.group = group;
    self
  }

  pub fn note_on(channel: UInt4, note: UInt7, velocity: impl Into<Velocity>) -> Self {
    Self::channel_voice(
      channel,
      ChannelVoiceMessage::NoteOn {
        note,
        velocity: velocity.into(),
        attribute: NoteAttribute::None,
      },
    )
  }

  pub fn note_off(channel: UInt4, note: UInt7, velocity: impl Into<Velocity>) -> Self {
    Self::channel_voice(
      channel,
      ChannelVoiceMessage::NoteOff {
        note,
        velocity: velocity.into(),
        attribute: NoteAttribute::None,
      },
    )
  }

  pub fn control_change(
    channel: UInt4,
    controller: UInt7,
    value: impl Into<ChannelVoiceValue>,
  ) -> Self {
    Self::channel_voice(
      channel,
      ChannelVoiceMessage::ControlChange {
        controller,
        value: value.into(),
      },
    )
  }

  pub fn program_change(channel: UInt4, program: UInt7) -> Self {
    Self::channel_voice(channel, ChannelVoiceMessage::ProgramChange { program })
  }

  pub fn pitch_bend(channel: UInt4, value: impl Into<PitchBendValue>) -> Self {
    Self::channel_voice(
      channel,
      ChannelVoiceMessage::PitchBend {
        value: value.into(),
      },
    )
  }

  pub fn channel_voice(channel: UInt4, message: ChannelVoiceMessage) -> Self {
    Self::new(
      UInt4::MIN,
      Message::ChannelVoice(ChannelVoice::new(channel, message)),
    )
  }

  pub fn time_code_quarter_frame(piece: MidiTimeCode) -> Self {
    Self::new(UInt4::MIN, Message::SystemCommon(SystemCommon::MidiTimeCode(piece)))
  }

  pub fn real_time(message: SystemRealTime) -> Self {
    Self::new(UInt4::MIN, Message::SystemRealTime(message))
  }

  pub fn utility(message: Utility) -> Self {
    Self::new(UInt4::MIN, Message::Utility(message))
  }

  pub fn system_exclusive(manufacturer: Manufacturer, data: Vec<UInt7>) -> Self {
    Self::new(
      UInt4::MIN,
      Message::SystemExclusive(SystemExclusive::new(manufacturer, data)),
    )
  }

  pub fn category(&self) -> Category {
    self.message.category()
  }

  pub fn is_channel_voice(&self) -> bool {
    self.category() == Category::ChannelVoice
  }

  pub fn is_system_common(&self) -> bool {
    self.category() == Category::SystemCommon
  }

  pub fn is_system_real_time(&self) -> bool {
    self.category() == Category::SystemRealTime
  }

  pub fn is_system_exclusive(&self) -> bool {
    self.category() == Category::SystemExclusive
  }

  pub fn is_utility(&self) -> bool {
    self.category() == Category::Utility
  }

  pub fn utility_type(&self) -> Option<UtilityType> {
    match &self.message {
      Message::Utility(utility) => Some(utility.kind()),
      _ => None,
    }
  }

  pub fn is_utility_of_type(&self, kind: UtilityType) -> bool {
    self.utility_type() == Some(kind)
  }

  /// False for an empty `kinds`.
  pub fn is_utility_of_types(&self, kinds: &[UtilityType]) -> bool {
    self
      .utility_type()
      .map_or(false, |kind| kinds.contains(&kind))
  }

  pub fn channel(&self) -> Option<UInt4> {
    match &self.message {
      Message::ChannelVoice(channel_voice) => Some(channel_voice.channel),
      _ => None,
    }
  }
}

impl std::fmt::Debug for Event {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{:x}] {:?}", self.group.value(), self.message)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_predicates() {
    let channel = UInt4::new(1).unwrap();
    let note = UInt7::new(60).unwrap();

    let note_on = Event::note_on(channel, note, 0.5);
    assert!(note_on.is_channel_voice());
    assert!(!note_on.is_system_common());
    assert_eq!(note_on.channel(), Some(channel));

    let clock = Event::real_time(SystemRealTime::TimingClock);
    assert!(clock.is_system_real_time());
    assert_eq!(clock.channel(), None);

    let sysex = Event::system_exclusive(Manufacturer::NON_REAL_TIME, vec![]);
    assert!(sysex.is_system_exclusive());

    let noop = Event::new(UInt4::MIN, Message::Utility(Utility::NoOp));
    assert!(noop.is_utility());
    assert_eq!(noop.category(), Category::Utility);
  }

  #[test]
  fn utility_types() {
    let noop = Event::utility(Utility::NoOp);
    let clock = Event::utility(Utility::JrClock(0x1234));
    let note_on = Event::note_on(UInt4::MIN, UInt7::MIDPOINT, UInt7::MAX);

    assert_eq!(clock.utility_type(), Some(UtilityType::JrClock));
    assert_eq!(note_on.utility_type(), None);

    let test_cases = vec![
      (&noop, vec![UtilityType::NoOp], true),
      (&noop, vec![UtilityType::JrClock], false),
      (&noop, vec![UtilityType::NoOp, UtilityType::JrClock], true),
      (&noop, vec![], false),
      (&clock, vec![UtilityType::JrClock], true),
      (&note_on, UtilityType::ALL.to_vec(), false),
    ];

    for (event, kinds, expected) in test_cases {
      assert_eq!(event.is_utility_of_types(&kinds), expected, "{:?} {:?}", event, kinds);
      if let [kind] = kinds.as_slice() {
        assert_eq!(event.is_utility_of_type(*kind), expected, "{:?} {:?}", event, kind);
      }
    }
  }

  #[test]
  fn equality_across_value_tags() {
    let channel = UInt4::MIN;
    let note = UInt7::new(60).unwrap();
    assert_eq!(
      Event::note_on(channel, note, 1.0),
      Event::note_on(channel, note, UInt7::MAX)
    );
    assert_ne!(
      Event::note_on(channel, note, 1.0),
      Event::note_off(channel, note, 1.0)
    );
  }

  #[test]
  fn debug_format() {
    let event = Event::program_change(UInt4::MIN, UInt7::MAX).with_group(UInt4::MAX);
    assert!(format!("{:?}", event).starts_with("[f] ChannelVoice"));
  }
}
