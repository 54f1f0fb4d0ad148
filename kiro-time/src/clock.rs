use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic time source, measured from an arbitrary origin.
pub trait Clock: Send + Sync {
  fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
  origin: Instant,
}

impl MonotonicClock {
  pub fn new() -> Self {
    Self {
      origin: Instant::now(),
    }
  }
}

impl Default for MonotonicClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for MonotonicClock {
  fn now(&self) -> Duration {
    self.origin.elapsed()
  }
}

/// A clock that only moves when told to. Useful for offline rendering and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
  nanos: AtomicU64,
}

impl ManualClock {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&self, time: Duration) {
    self.nanos.store(time.as_nanos() as u64, Ordering::Release);
  }

  pub fn advance(&self, delta: Duration) {
    self
      .nanos
      .fetch_add(delta.as_nanos() as u64, Ordering::AcqRel);
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Duration {
    Duration::from_nanos(self.nanos.load(Ordering::Acquire))
  }
}
