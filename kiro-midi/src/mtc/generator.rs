use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, trace, warn};

use kiro_time::{Clock, FrameRate, Timecode, TimecodeError};

use crate::config::GeneratorConfig;
use crate::event::Event;
use crate::mtc::encoder::Encoder;
use crate::mtc::full_frame::full_frame;
use crate::mtc::transport::{Transport, TransportError};
use crate::protocol::codec::{system_common, CodecError};
use crate::protocol::messages::system_common::SystemCommon;
use crate::protocol::messages::Message;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const QUARTER_FRAMES_PER_FRAME: u128 = 4;

#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("Transport: {0}")]
  Transport(#[from] TransportError),

  #[error("Invalid start position: {0}")]
  Timecode(#[from] TimecodeError),

  #[error("Codec: {0}")]
  Codec(#[from] CodecError),

  #[error("Failed to spawn the generator thread: {0}")]
  Spawn(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
  Stopped,
  Running,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStats {
  pub sent: u64,
  pub failed: u64,
  pub skipped: u64,
}

impl GeneratorStats {
  fn record(&mut self, report: &TickReport) {
    self.sent += report.sent as u64;
    self.failed += report.failures.len() as u64;
    self.skipped += report.skipped as u64;
  }
}

/// What happened during one [`Session::tick`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickReport {
  pub sent: usize,
  pub skipped: usize,
  pub failures: Vec<TransportError>,
}

/// A running quarter-frame schedule.
///
/// Emission `k` is due at `origin + k / (4 * fps)`, computed in whole nanoseconds
/// from the origin every time, so rounding never accumulates.
#[derive(Debug, Clone)]
pub struct Session {
  encoder: Encoder,
  rate: FrameRate,
  origin: Duration,
  emitted: u64,
}

impl Session {
  pub fn new(encoder: Encoder, origin: Duration) -> Self {
    Self {
      rate: encoder.timecode().rate(),
      encoder,
      origin,
      emitted: 0,
    }
  }

  pub fn timecode(&self) -> Timecode {
    self.encoder.timecode()
  }

  pub fn encoder(&self) -> &Encoder {
    &self.encoder
  }

  pub fn emitted(&self) -> u64 {
    self.emitted
  }

  pub fn due(&self, index: u64) -> Duration {
    let (numerator, denominator) = self.rate.ratio();
    let nanos = index as u128 * denominator as u128 * NANOS_PER_SECOND
      / (QUARTER_FRAMES_PER_FRAME * numerator as u128);
    self.origin + Duration::from_nanos(nanos as u64)
  }

  pub fn next_deadline(&self) -> Duration {
    self.due(self.emitted)
  }

  /// Number of emissions whose deadline is at or before `now`.
  fn due_count(&self, now: Duration) -> u64 {
    match now.checked_sub(self.origin) {
      None => 0,
      Some(elapsed) => {
        let (numerator, denominator) = self.rate.ratio();
        let period = denominator as u128 * NANOS_PER_SECOND;
        let scaled = (elapsed.as_nanos() + 1) * QUARTER_FRAMES_PER_FRAME * numerator as u128;
        ((scaled + period - 1) / period) as u64
      }
    }
  }

  /// Restarts the schedule at `timecode` from piece 0, with `now` as the new origin.
  pub fn relocate(&mut self, timecode: Timecode, now: Duration) {
    self.encoder.locate(timecode);
    self.rate = timecode.rate();
    self.origin = now;
    self.emitted = 0;
  }

  /// Sends every quarter frame due at `now`.
  ///
  /// When more than `max_catch_up` are overdue, the oldest ones are advanced
  /// over without being sent.
  pub fn tick<T>(&mut self, now: Duration, transport: &mut T, max_catch_up: u32) -> TickReport
  where
    T: Transport + ?Sized,
  {
    let mut report = TickReport::default();
    let mut pending = self.due_count(now).saturating_sub(self.emitted);

    let max_catch_up = u64::from(max_catch_up.max(1));
    if pending > max_catch_up {
      let skipped = pending - max_catch_up;
      for _ in 0..skipped {
        self.encoder.next_piece();
      }
      self.emitted += skipped;
      report.skipped = skipped as usize;
      pending = max_catch_up;
      debug!(skipped, "MTC generator fell behind");
    }

    for _ in 0..pending {
      let piece = self.encoder.next_piece();
      self.emitted += 1;
      let bytes = system_common::encode_midi1(&SystemCommon::MidiTimeCode(piece));
      trace!(index = piece.index(), nibble = %piece.nibble(), "Sending quarter frame");
      match transport.send(&bytes) {
        Ok(()) => report.sent += 1,
        Err(err) => {
          warn!(%err, index = piece.index(), "Failed to send quarter frame");
          report.failures.push(err);
        }
      }
    }

    report
  }
}

struct State {
  transport: Box<dyn Transport>,
  session: Option<Session>,
  position: Option<Timecode>,
  stats: GeneratorStats,
  generation: u64,
}

struct Shared {
  state: Mutex<State>,
  wakeup: Condvar,
}

/// Emits MIDI Time Code to a [`Transport`] from a dedicated worker thread.
pub struct Generator {
  shared: Arc<Shared>,
  clock: Arc<dyn Clock>,
  config: GeneratorConfig,
  worker: Mutex<Option<JoinHandle<()>>>,
}

impl Generator {
  pub fn new<T>(transport: T, clock: Arc<dyn Clock>) -> Self
  where
    T: Transport + 'static,
  {
    Self::with_config(transport, clock, GeneratorConfig::default())
  }

  pub fn with_config<T>(transport: T, clock: Arc<dyn Clock>, config: GeneratorConfig) -> Self
  where
    T: Transport + 'static,
  {
    let state = State {
      transport: Box::new(transport),
      session: None,
      position: None,
      stats: GeneratorStats::default(),
      generation: 0,
    };

    Self {
      shared: Arc::new(Shared {
        state: Mutex::new(state),
        wakeup: Condvar::new(),
      }),
      clock,
      config,
      worker: Mutex::new(None),
    }
  }

  pub fn config(&self) -> &GeneratorConfig {
    &self.config
  }

  /// Starts emitting quarter frames from `at`. A running session is replaced.
  pub fn start(&self, at: Timecode, rate: FrameRate) -> Result<(), GeneratorError> {
    let at = at.with_rate(rate)?;

    let previous = {
      let mut state = self.shared.state.lock();
      state.generation += 1;
      let generation = state.generation;

      let encoder = Encoder::new(at).with_group(self.config.group);
      state.session = Some(Session::new(encoder, self.clock.now()));
      state.position = Some(at);
      self.shared.wakeup.notify_all();

      let shared = self.shared.clone();
      let clock = self.clock.clone();
      let max_catch_up = self.config.max_catch_up;
      let spawned = thread::Builder::new()
        .name("kiro-mtc-generator".to_string())
        .spawn(move || run(shared, clock, generation, max_catch_up));

      match spawned {
        Ok(handle) => self.worker.lock().replace(handle),
        Err(err) => {
          state.session = None;
          return Err(GeneratorError::Spawn(err));
        }
      }
    };

    if let Some(previous) = previous {
      previous.join().ok();
    }

    debug!(timecode = %at, %rate, "MTC generator started");
    Ok(())
  }

  /// Sends a full frame message for `to` and, while running, resumes from there.
  pub fn locate(&self, to: Timecode) -> Result<(), GeneratorError> {
    let event = Event::new(self.config.group, Message::SystemExclusive(full_frame(&to)));
    let bytes = event.to_midi1_bytes()?;

    let mut state = self.shared.state.lock();
    let result = state.transport.send(&bytes);
    match &result {
      Ok(()) => state.stats.sent += 1,
      Err(err) => {
        state.stats.failed += 1;
        warn!(%err, timecode = %to, "Failed to send full frame");
      }
    }

    state.position = Some(to);
    let now = self.clock.now();
    if let Some(session) = state.session.as_mut() {
      session.relocate(to, now);
      self.shared.wakeup.notify_all();
    }

    debug!(timecode = %to, "MTC generator located");
    result.map_err(GeneratorError::from)
  }

  /// Stops emitting. Once this returns nothing else is sent.
  pub fn stop(&self) {
    let worker = {
      let mut state = self.shared.state.lock();
      state.generation += 1;
      if let Some(session) = state.session.take() {
        state.position = Some(session.timecode());
        debug!(timecode = %session.timecode(), "MTC generator stopped");
      }
      self.shared.wakeup.notify_all();
      self.worker.lock().take()
    };

    if let Some(worker) = worker {
      worker.join().ok();
    }
  }

  pub fn state(&self) -> GeneratorState {
    if self.shared.state.lock().session.is_some() {
      GeneratorState::Running
    } else {
      GeneratorState::Stopped
    }
  }

  pub fn timecode(&self) -> Option<Timecode> {
    let state = self.shared.state.lock();
    state
      .session
      .as_ref()
      .map(Session::timecode)
      .or(state.position)
  }

  pub fn stats(&self) -> GeneratorStats {
    self.shared.state.lock().stats
  }
}

impl Drop for Generator {
  fn drop(&mut self) {
    self.stop();
  }
}

fn run(shared: Arc<Shared>, clock: Arc<dyn Clock>, generation: u64, max_catch_up: u32) {
  let mut state = shared.state.lock();
  while state.generation == generation {
    let deadline = match state.session.as_ref() {
      Some(session) => session.next_deadline(),
      None => break,
    };

    let now = clock.now();
    if now < deadline {
      shared.wakeup.wait_for(&mut state, deadline - now);
    } else {
      let State {
        transport,
        session,
        stats,
        ..
      } = &mut *state;
      if let Some(session) = session.as_mut() {
        let report = session.tick(now, transport.as_mut(), max_catch_up);
        stats.record(&report);
      }
    }
  }
}
