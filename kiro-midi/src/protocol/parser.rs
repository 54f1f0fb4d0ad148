use std::collections::VecDeque;

use thiserror::Error;

use kiro_midi_core::UInt4;

use crate::event::Event;
use crate::filter::Filter;
use crate::protocol::codec::system_exclusive::{SYSEX_END, SYSEX_START};
use crate::protocol::codec::{CodecError, Malformed};
use crate::protocol::messages::system_common::{SystemCommon, SystemRealTime};

const NULL_STATUS: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
  #[error("System Exclusive message longer than {0} bytes")]
  SysExOverflow(usize),

  #[error("Event queue overflow")]
  QueueOverflow,

  #[error("Invalid message: {0}")]
  Codec(#[from] CodecError),
}

/// Turns a MIDI 1.0 byte stream into events.
///
/// Handles running status, real time bytes interleaved anywhere (also inside
/// System Exclusive), and skips data bytes that have no status to belong to.
pub struct Midi1Parser {
  group: UInt4,
  status: u8,
  len: usize,
  data: Vec<u8>,
  sysex: Vec<u8>,
  sysex_capacity: usize,
  events: VecDeque<Event>,
}

impl Midi1Parser {
  pub const DEFAULT_SYSEX_CAPACITY: usize = 256;

  const DATA_CAPACITY: usize = 2;
  const EVENTS_CAPACITY: usize = 16;

  pub fn new(group: UInt4) -> Self {
    Self::with_sysex_capacity(group, Self::DEFAULT_SYSEX_CAPACITY)
  }

  pub fn with_sysex_capacity(group: UInt4, sysex_capacity: usize) -> Self {
    Self {
      group,
      status: NULL_STATUS,
      len: 0,
      data: Vec::with_capacity(Self::DATA_CAPACITY),
      sysex: Vec::with_capacity(sysex_capacity),
      sysex_capacity,
      events: VecDeque::with_capacity(Self::EVENTS_CAPACITY),
    }
  }

  pub fn push(&mut self, byte: u8, filter: &Filter) -> Result<(), ParserError> {
    if Self::is_status(byte) {
      if Self::is_real_time(byte) {
        self.handle_real_time(byte, filter)
      } else {
        self.handle_status(byte, filter)
      }
    } else {
      self.handle_data(byte, filter)
    }
  }

  pub fn pop(&mut self) -> Option<Event> {
    self.events.pop_front()
  }

  pub fn reset(&mut self) {
    self.status = NULL_STATUS;
    self.len = 0;
    self.data.clear();
    self.sysex.clear();
    self.events.clear();
  }

  fn handle_real_time(&mut self, status: u8, filter: &Filter) -> Result<(), ParserError> {
    match SystemRealTime::from_status(status) {
      Some(message) => {
        if message == SystemRealTime::SystemReset {
          self.status = NULL_STATUS;
          self.len = 0;
          self.data.clear();
          self.sysex.clear();
        }
        self.emit(Event::real_time(message), filter)
      }
      // Undefined real time status
      None => Ok(()),
    }
  }

  fn handle_status(&mut self, status: u8, filter: &Filter) -> Result<(), ParserError> {
    let mut unterminated = false;
    if self.status == SYSEX_START {
      self.status = NULL_STATUS;
      let body = std::mem::take(&mut self.sysex);
      if status == SYSEX_END {
        return self.handle_sysex(body, filter);
      }
      unterminated = true;
    }

    self.data.clear();
    self.len = 0;
    let result = match status {
      SYSEX_START => {
        self.status = SYSEX_START;
        Ok(())
      }
      // Stray end of exclusive and reserved
      SYSEX_END | 0xf4 | 0xf5 => {
        self.status = NULL_STATUS;
        Ok(())
      }
      // Tune Request
      0xf6 => {
        self.status = NULL_STATUS;
        let event = Event::new(UInt4::MIN, SystemCommon::TuneRequest.into());
        self.emit(event, filter)
      }
      _ => {
        self.status = status;
        self.len = Self::expected_len(status);
        // Wait for the next data bytes
        Ok(())
      }
    };

    if unterminated {
      result.and(Err(CodecError::from(Malformed::MissingTerminator).into()))
    } else {
      result
    }
  }

  fn handle_data(&mut self, data: u8, filter: &Filter) -> Result<(), ParserError> {
    match self.status {
      // Skip data byte
      NULL_STATUS => Ok(()),
      SYSEX_START => {
        if self.sysex.len() < self.sysex_capacity {
          self.sysex.push(data);
          Ok(())
        } else {
          self.sysex.clear();
          self.status = NULL_STATUS;
          Err(ParserError::SysExOverflow(self.sysex_capacity))
        }
      }
      status => {
        self.data.push(data);
        if self.data.len() == self.len {
          self.handle_message(status, filter)
        } else {
          // Wait for the next data bytes
          Ok(())
        }
      }
    }
  }

  fn handle_message(&mut self, status: u8, filter: &Filter) -> Result<(), ParserError> {
    let mut bytes = [status, 0, 0];
    bytes[1..=self.len].copy_from_slice(&self.data);
    self.data.clear();
    // Running status only applies to channel messages
    if status >= 0xf0 {
      self.status = NULL_STATUS;
    }
    let event = Event::from_midi1_bytes(&bytes[..=self.len])?;
    self.emit(event, filter)
  }

  fn handle_sysex(&mut self, body: Vec<u8>, filter: &Filter) -> Result<(), ParserError> {
    let mut bytes = Vec::with_capacity(body.len() + 2);
    bytes.push(SYSEX_START);
    bytes.extend(body);
    bytes.push(SYSEX_END);
    let event = Event::from_midi1_bytes(&bytes)?;
    self.emit(event, filter)
  }

  fn emit(&mut self, event: Event, filter: &Filter) -> Result<(), ParserError> {
    let event = event.with_group(self.group);
    if !filter.matches(&event) {
      Ok(())
    } else if self.events.len() < Self::EVENTS_CAPACITY {
      self.events.push_back(event);
      Ok(())
    } else {
      Err(ParserError::QueueOverflow)
    }
  }

  #[inline]
  fn is_status(data: u8) -> bool {
    data & 0x80 != 0
  }

  #[inline]
  fn is_real_time(status: u8) -> bool {
    status >= 0xf8
  }

  #[inline]
  fn expected_len(status: u8) -> usize {
    match status {
      0xc0..=0xdf | 0xf1 | 0xf3 => 1,
      _ => 2,
    }
  }
}

#[cfg(test)]
mod tests {
  use kiro_midi_core::{ChannelVoiceValue, PitchBendValue, UInt14, UInt7, Velocity};

  use super::*;
  use crate::protocol::messages::channel_voice::{ChannelVoiceMessage, NoteAttribute};
  use crate::protocol::messages::system_common::MidiTimeCode;
  use crate::protocol::messages::system_exclusive::Manufacturer;
  use crate::protocol::messages::Category;

  fn uint4(value: u8) -> UInt4 {
    UInt4::new(value).unwrap()
  }

  fn uint7(value: u8) -> UInt7 {
    UInt7::new(value).unwrap()
  }

  fn note_off(channel: u8, note: u8, velocity: u8) -> Event {
    Event::channel_voice(
      uint4(channel),
      ChannelVoiceMessage::NoteOff {
        note: uint7(note),
        velocity: Velocity::Midi1(uint7(velocity)),
        attribute: NoteAttribute::None,
      },
    )
  }

  fn assert_parses(bytes: Vec<u8>, expected: Vec<Event>) -> Midi1Parser {
    assert_parses_with(Filter::new(), bytes, expected)
  }

  fn assert_parses_with(filter: Filter, bytes: Vec<u8>, expected: Vec<Event>) -> Midi1Parser {
    let mut parser = Midi1Parser::new(UInt4::MIN);
    let mut events = Vec::new();

    for byte in bytes {
      match parser.push(byte, &filter) {
        Ok(()) => {
          while let Some(event) = parser.pop() {
            events.push(event);
          }
        }
        Err(err) => panic!("Unexpected error: {:?}", err),
      }
    }

    assert_eq!(events, expected);
    parser
  }

  #[test]
  fn incomplete_message() {
    assert_parses(vec![0x89, 0x40, 0x82, 0x18, 0], vec![note_off(2, 0x18, 0)]);
  }

  #[test]
  fn running_status() {
    assert_parses(
      vec![0x89, 0x40, 0x7f, 0x41, 0x40, 0x82, 0x18, 0],
      vec![
        note_off(9, 0x40, 0x7f),
        note_off(9, 0x41, 0x40),
        note_off(2, 0x18, 0),
      ],
    );
  }

  #[test]
  fn channel_voice_messages() {
    assert_parses(
      vec![
        0x99, 0x40, 0x00, 0xa1, 0x10, 0x20, 0xb2, 0x07, 0x7f, 0xc3, 0x05, 0x06, 0xd4, 0x01, 0xe5,
        0x00, 0x40,
      ],
      vec![
        Event::note_on(uint4(9), uint7(0x40), UInt7::MIN),
        Event::channel_voice(
          uint4(1),
          ChannelVoiceMessage::NotePressure {
            note: uint7(0x10),
            amount: ChannelVoiceValue::Midi1(uint7(0x20)),
          },
        ),
        Event::control_change(uint4(2), uint7(7), UInt7::MAX),
        Event::program_change(uint4(3), uint7(5)),
        Event::program_change(uint4(3), uint7(6)),
        Event::channel_voice(
          uint4(4),
          ChannelVoiceMessage::ChannelPressure {
            amount: ChannelVoiceValue::Midi1(uint7(1)),
          },
        ),
        Event::pitch_bend(uint4(5), PitchBendValue::Midi1(UInt14::MIDPOINT)),
      ],
    );
  }

  #[test]
  fn system_common() {
    assert_parses(
      vec![
        0xf1, 0x7f, 0xf2, 0x7f, 0x7f, 0xf3, 0x7f, 0xf6, 0xf8, 0xfa, 0xfb, 0xfc, 0xfe, 0xff,
      ],
      vec![
        Event::time_code_quarter_frame(MidiTimeCode::HoursMostSignificantNibble(UInt4::MAX)),
        Event::new(
          UInt4::MIN,
          SystemCommon::SongPositionPointer(UInt14::MAX).into(),
        ),
        Event::new(UInt4::MIN, SystemCommon::SongSelect(UInt7::MAX).into()),
        Event::new(UInt4::MIN, SystemCommon::TuneRequest.into()),
        Event::real_time(SystemRealTime::TimingClock),
        Event::real_time(SystemRealTime::Start),
        Event::real_time(SystemRealTime::Continue),
        Event::real_time(SystemRealTime::Stop),
        Event::real_time(SystemRealTime::ActiveSensing),
        Event::real_time(SystemRealTime::SystemReset),
      ],
    );
  }

  #[test]
  fn system_common_has_no_running_status() {
    assert_parses(
      vec![0xf1, 0x01, 0x02, 0xf3, 0x03],
      vec![
        Event::time_code_quarter_frame(MidiTimeCode::FrameLessSignificantNibble(uint4(1))),
        Event::new(UInt4::MIN, SystemCommon::SongSelect(uint7(3)).into()),
      ],
    );
  }

  #[test]
  fn system_reset() {
    let parser = assert_parses(
      vec![0x82, 0x18, 0xff, 0x00],
      vec![Event::real_time(SystemRealTime::SystemReset)],
    );

    assert_eq!(parser.status, NULL_STATUS);
    assert_eq!(parser.len, 0);
    assert!(parser.data.is_empty());
  }

  #[test]
  fn system_real_time_interleave() {
    assert_parses(
      vec![0x89, 0x40, 0xfa, 0x7f, 0xfb, 0x41, 0xfc, 0x40],
      vec![
        Event::real_time(SystemRealTime::Start),
        note_off(9, 0x40, 0x7f),
        Event::real_time(SystemRealTime::Continue),
        Event::real_time(SystemRealTime::Stop),
        note_off(9, 0x41, 0x40),
      ],
    );
  }

  #[test]
  fn undefined_real_time_is_ignored() {
    assert_parses(vec![0x90, 0xf9, 0x40, 0xfd, 0x7f], vec![
      Event::note_on(UInt4::MIN, uint7(0x40), UInt7::MAX),
    ]);
  }

  #[test]
  fn system_exclusive() {
    assert_parses(
      vec![0xf0, 0x7e, 0x01, 0xf8, 0x02, 0x03, 0xf7, 0x42],
      vec![
        Event::real_time(SystemRealTime::TimingClock),
        Event::system_exclusive(
          Manufacturer::NON_REAL_TIME,
          vec![uint7(1), uint7(2), uint7(3)],
        ),
      ],
    );
  }

  #[test]
  fn system_exclusive_unterminated() {
    let filter = Filter::new();
    let mut parser = Midi1Parser::new(UInt4::MIN);
    for byte in [0xf0, 0x7e, 0x01] {
      assert_eq!(parser.push(byte, &filter), Ok(()));
    }
    let result = parser.push(0x90, &filter);
    assert!(
      matches!(
        result,
        Err(ParserError::Codec(CodecError::MalformedMessage(
          Malformed::MissingTerminator
        )))
      ),
      "Unexpected result: {:?}",
      result
    );
    for byte in [0x40, 0x7f] {
      assert_eq!(parser.push(byte, &filter), Ok(()));
    }
    assert_eq!(
      parser.pop(),
      Some(Event::note_on(UInt4::MIN, uint7(0x40), UInt7::MAX))
    );
  }

  #[test]
  fn system_exclusive_overflow() {
    let filter = Filter::new();
    let mut parser = Midi1Parser::with_sysex_capacity(UInt4::MIN, 2);
    for byte in [0xf0, 0x7e, 0x01] {
      assert_eq!(parser.push(byte, &filter), Ok(()));
    }
    assert_eq!(parser.push(0x02, &filter), Err(ParserError::SysExOverflow(2)));
    assert_eq!(parser.push(0x03, &filter), Ok(()));
    assert_eq!(parser.push(0xf7, &filter), Ok(()));
    assert_eq!(parser.pop(), None);
  }

  #[test]
  fn stray_data_is_skipped() {
    assert_parses(vec![0x01, 0x02, 0xf7, 0x03, 0xc0, 0x04], vec![
      Event::program_change(UInt4::MIN, uint7(4)),
    ]);
  }

  #[test]
  fn events_take_the_parser_group() {
    let filter = Filter::new();
    let mut parser = Midi1Parser::new(uint4(7));
    parser.push(0xfa, &filter).expect("push");
    assert_eq!(parser.pop().map(|event| event.group), Some(uint4(7)));
  }

  #[test]
  fn filtered_events() {
    let filter = Filter::new().with_categories(&[Category::SystemCommon]);
    assert_parses_with(
      filter,
      vec![0xf8, 0x90, 0x40, 0x7f, 0xf1, 0x21],
      vec![Event::time_code_quarter_frame(
        MidiTimeCode::SecondsLessSignificantNibble(uint4(1)),
      )],
    );
  }

  #[test]
  fn queue_overflow() {
    let filter = Filter::new();
    let mut parser = Midi1Parser::new(UInt4::MIN);
    for _ in 0..Midi1Parser::EVENTS_CAPACITY {
      assert_eq!(parser.push(0xf8, &filter), Ok(()));
    }
    assert_eq!(parser.push(0xf8, &filter), Err(ParserError::QueueOverflow));
    assert!(parser.pop().is_some());
    assert_eq!(parser.push(0xf8, &filter), Ok(()));
  }

  #[test]
  fn reset_discards_partial_state() {
    let filter = Filter::new();
    let mut parser = Midi1Parser::new(UInt4::MIN);
    for byte in [0xfa, 0x90, 0x40] {
      parser.push(byte, &filter).expect("push");
    }
    parser.reset();
    parser.push(0x7f, &filter).expect("push");
    assert_eq!(parser.pop(), None);
  }
}
