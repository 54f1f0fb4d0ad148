use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use ringbuf::{Consumer, RingBuffer};
use thiserror::Error;
use tracing::{debug, trace, warn};

use kiro_time::{Clock, Timecode};

use crate::config::ReceiverConfig;
use crate::event::Event;
use crate::filter::Filter;
use crate::mtc::decoder::{Decoder, Direction, ReceiverEvent, ReceiverState};
use crate::mtc::handler::ReceiverHandler;
use crate::protocol::messages::Category;
use crate::protocol::parser::{Midi1Parser, ParserError};

#[derive(Debug, Error)]
pub enum ReceiverError {
  #[error("Parser: {0}")]
  Parser(#[from] ParserError),

  #[error("Failed to spawn the watchdog thread: {0}")]
  Spawn(#[source] std::io::Error),
}

struct Core {
  decoder: Decoder,
  parser: Midi1Parser,
  filter: Filter,
  handler: ReceiverHandler,
  running: bool,
  generation: u64,
}

impl Core {
  fn handle_event(&mut self, event: &Event, now: Duration) {
    let Core {
      decoder, handler, ..
    } = self;
    decoder.handle_event(event, now, &mut |report| handler.call(report));
  }

  fn poll(&mut self, now: Duration) {
    let Core {
      decoder, handler, ..
    } = self;
    decoder.poll(now, &mut |report| handler.call(report));
  }
}

struct Shared {
  core: Mutex<Core>,
  wakeup: Condvar,
}

/// Locks onto incoming MIDI Time Code.
///
/// Input is only taken between [`Receiver::start`] and [`Receiver::stop`].
/// Reports go to the [`ReceiverHandler`], which is called with the receiver
/// locked and must not call back into it.
pub struct Receiver {
  shared: Arc<Shared>,
  clock: Arc<dyn Clock>,
  config: ReceiverConfig,
  watchdog: Mutex<Option<JoinHandle<()>>>,
}

impl Receiver {
  pub fn new<H>(handler: H, clock: Arc<dyn Clock>) -> Self
  where
    H: Into<ReceiverHandler>,
  {
    Self::with_config(handler, clock, ReceiverConfig::default())
  }

  pub fn with_config<H>(handler: H, clock: Arc<dyn Clock>, config: ReceiverConfig) -> Self
  where
    H: Into<ReceiverHandler>,
  {
    let filter = Filter::new()
      .with_categories(&[Category::SystemCommon, Category::SystemExclusive])
      .with_groups(&[config.group]);

    let core = Core {
      decoder: Decoder::new(config.dropout_threshold),
      parser: Midi1Parser::with_sysex_capacity(config.group, config.sysex_capacity),
      filter,
      handler: handler.into(),
      running: false,
      generation: 0,
    };

    Self {
      shared: Arc::new(Shared {
        core: Mutex::new(core),
        wakeup: Condvar::new(),
      }),
      clock,
      config,
      watchdog: Mutex::new(None),
    }
  }

  /// A receiver reporting into a ring buffer of `config.ringbuf_size` entries.
  pub fn with_ring_buffer(
    clock: Arc<dyn Clock>,
    config: ReceiverConfig,
  ) -> (Self, Consumer<ReceiverEvent>) {
    let (producer, consumer) = RingBuffer::new(config.ringbuf_size).split();
    (Self::with_config(producer, clock, config), consumer)
  }

  pub fn config(&self) -> &ReceiverConfig {
    &self.config
  }

  /// Starts taking input and the dropout watchdog. Does nothing when it is already running.
  pub fn start(&self) -> Result<(), ReceiverError> {
    let mut watchdog = self.watchdog.lock();
    if watchdog.is_some() {
      return Ok(());
    }

    let generation = {
      let mut core = self.shared.core.lock();
      core.running = true;
      core.generation += 1;
      core.generation
    };

    let shared = self.shared.clone();
    let clock = self.clock.clone();
    let interval = self.config.watchdog_interval;
    let handle = thread::Builder::new()
      .name("kiro-mtc-watchdog".to_string())
      .spawn(move || watch(shared, clock, generation, interval))
      .map_err(ReceiverError::Spawn)?;

    watchdog.replace(handle);
    debug!("MTC receiver started");
    Ok(())
  }

  /// Stops the watchdog and goes back to idle, discarding any partial input.
  /// Once this returns further input is ignored until the next `start`.
  pub fn stop(&self) {
    let watchdog = self.watchdog.lock().take();
    {
      let mut core = self.shared.core.lock();
      core.running = false;
      core.generation += 1;
      core.parser.reset();
      let Core {
        decoder, handler, ..
      } = &mut *core;
      decoder.reset(&mut |report| handler.call(report));
      self.shared.wakeup.notify_all();
    }

    if let Some(watchdog) = watchdog {
      watchdog.join().ok();
      debug!("MTC receiver stopped");
    }
  }

  /// Feeds a run of MIDI 1.0 bytes. Ignored while stopped.
  ///
  /// Every byte is processed. When some of them were malformed the first
  /// error is returned once the whole run went through.
  pub fn midi_in(&self, bytes: &[u8]) -> Result<(), ReceiverError> {
    let now = self.clock.now();
    let mut core = self.shared.core.lock();
    if !core.running {
      trace!(len = bytes.len(), "MTC receiver stopped, ignoring input");
      return Ok(());
    }
    core.poll(now);

    let mut first_error = None;
    for byte in bytes.iter().copied() {
      let Core { parser, filter, .. } = &mut *core;
      if let Err(err) = parser.push(byte, filter) {
        warn!(%err, byte, "Malformed MIDI input");
        first_error.get_or_insert(err);
      }
      while let Some(event) = core.parser.pop() {
        core.handle_event(&event, now);
      }
    }

    first_error.map_or(Ok(()), |err| Err(err.into()))
  }

  /// Feeds an already decoded event. Events outside the receiver group are
  /// ignored, and so is everything while stopped.
  pub fn handle_event(&self, event: &Event) {
    let now = self.clock.now();
    let mut core = self.shared.core.lock();
    if !core.running {
      return;
    }
    core.poll(now);
    if core.filter.matches(event) {
      core.handle_event(event, now);
    }
  }

  /// Checks for a dropout, for when the watchdog is not running.
  pub fn poll(&self) {
    let now = self.clock.now();
    let mut core = self.shared.core.lock();
    if core.running {
      core.poll(now);
    }
  }

  pub fn state(&self) -> ReceiverState {
    self.shared.core.lock().decoder.state()
  }

  pub fn timecode(&self) -> Option<Timecode> {
    self.shared.core.lock().decoder.timecode()
  }

  pub fn direction(&self) -> Option<Direction> {
    self.shared.core.lock().decoder.direction()
  }
}

impl Drop for Receiver {
  fn drop(&mut self) {
    self.stop();
  }
}

fn watch(shared: Arc<Shared>, clock: Arc<dyn Clock>, generation: u64, interval: Duration) {
  let mut core = shared.core.lock();
  while core.generation == generation {
    shared.wakeup.wait_for(&mut core, interval);
    if core.generation == generation {
      core.poll(clock.now());
    }
  }
}
