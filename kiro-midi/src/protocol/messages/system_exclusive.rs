use kiro_midi_core::UInt7;

/// Manufacturer ID that prefixes a System Exclusive payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manufacturer {
  /// Single byte ID. `0x00` is reserved for the extended form.
  OneByte(UInt7),
  /// Extended ID, sent as `0x00` followed by these two bytes.
  ThreeByte(UInt7, UInt7),
}

impl Manufacturer {
  pub const NON_REAL_TIME: Self = Self::OneByte(UInt7::constant(0x7e));
  pub const REAL_TIME: Self = Self::OneByte(UInt7::constant(0x7f));

  pub fn is_universal(&self) -> bool {
    *self == Self::NON_REAL_TIME || *self == Self::REAL_TIME
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemExclusive {
  pub manufacturer: Manufacturer,
  pub data: Vec<UInt7>,
}

impl SystemExclusive {
  pub fn new(manufacturer: Manufacturer, data: Vec<UInt7>) -> Self {
    Self { manufacturer, data }
  }

  pub fn data_bytes(&self) -> impl Iterator<Item = u8> + '_ {
    self.data.iter().map(|byte| byte.value())
  }
}
