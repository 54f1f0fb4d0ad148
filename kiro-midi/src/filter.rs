use std::fmt::{Debug, Formatter};

use kiro_midi_core::UInt4;

use crate::event::Event;
use crate::protocol::messages::utility::UtilityType;
use crate::protocol::messages::Category;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Filter {
  categories: u8,
  utility_types: u8,
  groups: u16,
  channels: [u16; 16],
}

impl Filter {
  const ALL_CATEGORIES: u8 = 0x1f;
  const ALL_UTILITY_TYPES: u8 = 0x07;

  pub fn new() -> Self {
    Self {
      categories: Self::ALL_CATEGORIES,
      utility_types: Self::ALL_UTILITY_TYPES,
      groups: 0xffff,
      channels: [0xffff; 16],
    }
  }

  #[must_use]
  pub fn with_categories(mut self, categories: &[Category]) -> Self {
    self.categories = 0;
    for category in categories.iter() {
      self.categories |= category.mask();
    }
    self
  }

  /// Passes utility messages of `kinds` only, leaving other categories as they are.
  #[must_use]
  pub fn with_utility_types(mut self, kinds: &[UtilityType]) -> Self {
    self.utility_types = 0;
    for kind in kinds.iter() {
      self.utility_types |= kind.mask();
    }
    self
  }

  #[must_use]
  pub fn without_utility_types(mut self, kinds: &[UtilityType]) -> Self {
    for kind in kinds.iter() {
      self.utility_types &= !kind.mask();
    }
    self
  }

  #[must_use]
  pub fn only_utility(self) -> Self {
    self.with_categories(&[Category::Utility])
  }

  #[must_use]
  pub fn only_utility_types(self, kinds: &[UtilityType]) -> Self {
    self.only_utility().with_utility_types(kinds)
  }

  #[must_use]
  pub fn without_utility(mut self) -> Self {
    self.categories &= !Category::Utility.mask();
    self
  }

  #[must_use]
  pub fn with_groups(mut self, groups: &[UInt4]) -> Self {
    self.groups = 0;
    for group in groups.iter() {
      self.groups |= 1 << group.value();
    }
    self
  }

  #[must_use]
  pub fn with_channels(mut self, group: UInt4, channels: &[UInt4]) -> Self {
    let group = group.value() as usize;
    self.channels[group] = 0;
    for channel in channels.iter() {
      self.channels[group] |= 1 << channel.value();
    }
    self
  }

  #[inline]
  pub fn category(&self, category: Category) -> bool {
    (self.categories & category.mask()) != 0
  }

  #[inline]
  pub fn utility_type(&self, kind: UtilityType) -> bool {
    (self.utility_types & kind.mask()) != 0
  }

  #[inline]
  pub fn group(&self, group: UInt4) -> bool {
    let mask = 1 << group.value();
    (self.groups & mask) != 0
  }

  #[inline]
  pub fn channel(&self, group: UInt4, channel: UInt4) -> bool {
    let mask = 1 << channel.value();
    (self.channels[group.value() as usize] & mask) != 0
  }

  pub fn matches(&self, event: &Event) -> bool {
    self.category(event.category())
      && event.utility_type().map_or(true, |kind| self.utility_type(kind))
      && self.group(event.group)
      && event
        .channel()
        .map_or(true, |channel| self.channel(event.group, channel))
  }

  pub fn apply<'a, I>(&self, events: I) -> Vec<Event>
  where
    I: IntoIterator<Item = &'a Event>,
  {
    events
      .into_iter()
      .filter(|event| self.matches(event))
      .cloned()
      .collect()
  }
}

impl Default for Filter {
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for Filter {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "MidiFilter:")?;
    writeln!(
      f,
      "  CT : {:05b}  UT : {:03b}  GR : {:016b}",
      self.categories, self.utility_types, self.groups
    )?;
    for i in 0..8 {
      let j = i * 2;
      writeln!(
        f,
        "  G{:02}: {:016b}  G{:02}: {:016b}",
        j,
        self.channels[j],
        j + 1,
        self.channels[j + 1]
      )?;
    }
    Ok(())
  }
}
