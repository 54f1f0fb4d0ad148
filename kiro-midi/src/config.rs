use std::time::Duration;

use kiro_midi_core::UInt4;

use crate::protocol::parser::Midi1Parser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
  /// UMP group stamped on the generated events.
  pub group: UInt4,
  /// Overdue quarter frames sent in one go after a stall. The rest are skipped.
  pub max_catch_up: u32,
}

impl GeneratorConfig {
  pub const DEFAULT_MAX_CATCH_UP: u32 = 8;
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      group: UInt4::MIN,
      max_catch_up: GeneratorConfig::DEFAULT_MAX_CATCH_UP,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
  pub group: UInt4,
  pub dropout_threshold: Duration,
  pub watchdog_interval: Duration,
  pub sysex_capacity: usize,
  pub ringbuf_size: usize,
}

impl ReceiverConfig {
  /// Above the 8 piece cycle time of the slowest rate (24 fps, 83 ms).
  pub const DEFAULT_DROPOUT_THRESHOLD: Duration = Duration::from_millis(100);
  pub const DEFAULT_WATCHDOG_INTERVAL: Duration = Duration::from_millis(20);
  pub const DEFAULT_SYSEX_CAPACITY: usize = Midi1Parser::DEFAULT_SYSEX_CAPACITY;
  pub const DEFAULT_RINGBUF_SIZE: usize = 1024;
}

impl Default for ReceiverConfig {
  fn default() -> Self {
    Self {
      group: UInt4::MIN,
      dropout_threshold: ReceiverConfig::DEFAULT_DROPOUT_THRESHOLD,
      watchdog_interval: ReceiverConfig::DEFAULT_WATCHDOG_INTERVAL,
      sysex_capacity: ReceiverConfig::DEFAULT_SYSEX_CAPACITY,
      ringbuf_size: ReceiverConfig::DEFAULT_RINGBUF_SIZE,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MtcConfig {
  pub generator: GeneratorConfig,
  pub receiver: ReceiverConfig,
}
