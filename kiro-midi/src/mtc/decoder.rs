use std::time::Duration;

use tracing::{debug, info, trace, warn};

use kiro_time::Timecode;

use crate::event::Event;
use crate::mtc::full_frame::parse_full_frame;
use crate::mtc::quarter_frame::{QuarterFrameBuffer, PIECES};
use crate::protocol::messages::system_common::{MidiTimeCode, SystemCommon};
use crate::protocol::messages::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  Forward,
  Backward,
}

impl Direction {
  fn next_index(self, index: u8) -> u8 {
    match self {
      Self::Forward => (index + 1) % PIECES,
      Self::Backward => (index + PIECES - 1) % PIECES,
    }
  }

  /// The piece that closes a cycle when travelling in this direction.
  fn last_index(self) -> u8 {
    match self {
      Self::Forward => PIECES - 1,
      Self::Backward => 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverState {
  Idle,
  Assembling,
  Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverEvent {
  StateChanged(ReceiverState),
  Timecode {
    timecode: Timecode,
    direction: Direction,
  },
  FullFrame(Timecode),
  Dropout,
}

/// Turns incoming MTC messages into timecode reports.
///
/// Quarter frames are accepted only in sequence. Anything out of order restarts
/// the assembly at that piece instead of failing.
#[derive(Debug, Clone)]
pub struct Decoder {
  dropout_threshold: Duration,
  state: ReceiverState,
  buffer: QuarterFrameBuffer,
  last_index: Option<u8>,
  direction: Option<Direction>,
  timecode: Option<Timecode>,
  last_activity: Option<Duration>,
}

impl Decoder {
  pub fn new(dropout_threshold: Duration) -> Self {
    Self {
      dropout_threshold,
      state: ReceiverState::Idle,
      buffer: QuarterFrameBuffer::default(),
      last_index: None,
      direction: None,
      timecode: None,
      last_activity: None,
    }
  }

  pub fn state(&self) -> ReceiverState {
    self.state
  }

  pub fn timecode(&self) -> Option<Timecode> {
    self.timecode
  }

  pub fn direction(&self) -> Option<Direction> {
    self.direction
  }

  pub fn handle_event(
    &mut self,
    event: &Event,
    now: Duration,
    report: &mut dyn FnMut(ReceiverEvent),
  ) {
    match &event.message {
      Message::SystemCommon(SystemCommon::MidiTimeCode(piece)) => {
        self.quarter_frame(*piece, now, report)
      }
      Message::SystemExclusive(message) => match parse_full_frame(message) {
        Some(Ok(timecode)) => self.full_frame(timecode, now, report),
        Some(Err(err)) => warn!(%err, "Ignoring invalid full frame"),
        None => {}
      },
      _ => {}
    }
  }

  pub fn quarter_frame(
    &mut self,
    piece: MidiTimeCode,
    now: Duration,
    report: &mut dyn FnMut(ReceiverEvent),
  ) {
    self.last_activity = Some(now);
    let index = piece.index();
    trace!(index, nibble = %piece.nibble(), "Quarter frame");

    let last_index = match self.last_index {
      Some(last_index) => last_index,
      None => {
        self.begin(piece, report);
        return;
      }
    };

    let current = self.direction;
    let direction = match current {
      Some(direction) if direction.next_index(last_index) == index => direction,
      None if Direction::Forward.next_index(last_index) == index => Direction::Forward,
      None if Direction::Backward.next_index(last_index) == index => Direction::Backward,
      _ => {
        let expected = current.map(|direction| direction.next_index(last_index));
        debug!(?expected, index, "Quarter frame out of sequence");
        self.set_state(ReceiverState::Assembling, report);
        self.begin(piece, report);
        return;
      }
    };

    self.direction = Some(direction);
    self.last_index = Some(index);
    self.buffer.insert(piece);

    if index == direction.last_index() {
      if let Some(result) = self.buffer.assemble() {
        match result {
          Ok(timecode) => {
            self.timecode = Some(timecode);
            self.set_state(ReceiverState::Locked, report);
            report(ReceiverEvent::Timecode { timecode, direction });
          }
          Err(err) => warn!(%err, "Assembled an invalid timecode"),
        }
      }
      self.buffer.clear();
    }
  }

  pub fn full_frame(
    &mut self,
    timecode: Timecode,
    now: Duration,
    report: &mut dyn FnMut(ReceiverEvent),
  ) {
    self.last_activity = Some(now);
    self.buffer.clear();
    self.last_index = None;
    self.direction = None;
    self.timecode = Some(timecode);
    debug!(%timecode, "Full frame");
    self.set_state(ReceiverState::Locked, report);
    report(ReceiverEvent::FullFrame(timecode));
  }

  /// Goes back to idle when nothing arrived for longer than the dropout threshold.
  pub fn poll(&mut self, now: Duration, report: &mut dyn FnMut(ReceiverEvent)) {
    let expired = self
      .last_activity
      .map(|last| now.saturating_sub(last) > self.dropout_threshold)
      .unwrap_or(false);

    if expired && self.state != ReceiverState::Idle {
      let was_locked = self.state == ReceiverState::Locked;
      self.clear();
      if was_locked {
        info!(timecode = ?self.timecode, "MTC dropout");
        report(ReceiverEvent::Dropout);
      }
      self.set_state(ReceiverState::Idle, report);
    }
  }

  pub fn reset(&mut self, report: &mut dyn FnMut(ReceiverEvent)) {
    self.clear();
    self.timecode = None;
    self.set_state(ReceiverState::Idle, report);
  }

  fn begin(&mut self, piece: MidiTimeCode, report: &mut dyn FnMut(ReceiverEvent)) {
    self.buffer.clear();
    self.buffer.insert(piece);
    self.last_index = Some(piece.index());
    self.direction = None;
    if self.state == ReceiverState::Idle {
      self.set_state(ReceiverState::Assembling, report);
    }
  }

  fn clear(&mut self) {
    self.buffer.clear();
    self.last_index = None;
    self.direction = None;
    self.last_activity = None;
  }

  fn set_state(&mut self, state: ReceiverState, report: &mut dyn FnMut(ReceiverEvent)) {
    if self.state != state {
      match state {
        ReceiverState::Locked => info!(timecode = ?self.timecode, "MTC locked"),
        _ => debug!(from = ?self.state, to = ?state, "MTC receiver state changed"),
      }
      self.state = state;
      report(ReceiverEvent::StateChanged(state));
    }
  }
}
