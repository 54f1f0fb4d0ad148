use crate::event::Event;
use crate::filter::Filter;
use crate::protocol::codec::{ump_len, CodecError};

/// Assembles UMP packets word by word.
#[derive(Debug, Default)]
pub struct UmpDecoder {
  ump: [u32; 4],
  index: usize,
  len: usize,
}

impl UmpDecoder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn next(&mut self, data: u32, filter: &Filter) -> Result<Option<Event>, CodecError> {
    if self.index == 0 {
      self.init(data);
    }
    self.push(data);

    if self.is_complete() {
      let result = Event::from_ump_words(&self.ump[0..self.len]);
      self.reset();
      let event = result?;
      Ok(filter.matches(&event).then(|| event))
    } else {
      Ok(None)
    }
  }

  fn init(&mut self, data: u32) {
    let mtype = ((data >> 28) & 0x0f) as u8;
    self.len = ump_len(mtype);
  }

  fn push(&mut self, data: u32) {
    self.ump[self.index] = data;
    self.index += 1;
  }

  fn is_complete(&self) -> bool {
    self.index == self.len
  }

  pub fn reset(&mut self) {
    self.index = 0;
    self.len = 0;
  }
}
