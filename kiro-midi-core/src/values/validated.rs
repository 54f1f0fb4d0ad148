use crate::values::ScaledValue;

/// Keeps a unit interval value clamped to `[0, 1]` across every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Validated<V>(V);

impl<V: ScaledValue> Validated<V> {
  pub fn new(value: V) -> Self {
    Self(value.saturated())
  }

  pub fn get(&self) -> V {
    self.0
  }

  pub fn set(&mut self, value: V) {
    self.0 = value.saturated();
  }

  pub fn into_inner(self) -> V {
    self.0
  }
}

impl<V: ScaledValue> From<V> for Validated<V> {
  fn from(value: V) -> Self {
    Self::new(value)
  }
}
