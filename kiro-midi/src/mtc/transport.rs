use ringbuf::Producer;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
  #[error("Destination is disconnected")]
  Disconnected,

  #[error("Destination is full")]
  Full,

  #[error("Send failed: {0}")]
  Failed(String),
}

/// Send capability towards a MIDI 1.0 destination. Implementations must not block.
///
/// A running [`crate::mtc::Generator`] calls `send` from its worker thread with the
/// generator locked, so calling back into that generator from here deadlocks.
pub trait Transport: Send {
  fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

impl<F> Transport for F
where
  F: FnMut(&[u8]) -> Result<(), TransportError> + Send,
{
  fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
    (self)(bytes)
  }
}

/// Writes whole messages into a byte ring buffer, or nothing at all.
pub struct RingBufferTransport {
  producer: Producer<u8>,
}

impl RingBufferTransport {
  pub fn new(producer: Producer<u8>) -> Self {
    Self { producer }
  }
}

impl Transport for RingBufferTransport {
  fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
    if self.producer.remaining() < bytes.len() {
      Err(TransportError::Full)
    } else {
      self.producer.push_slice(bytes);
      Ok(())
    }
  }
}

impl From<Producer<u8>> for RingBufferTransport {
  fn from(producer: Producer<u8>) -> Self {
    RingBufferTransport::new(producer)
  }
}

#[cfg(test)]
mod tests {
  use ringbuf::RingBuffer;

  use super::*;

  #[test]
  fn from_closure() {
    let mut sent = Vec::new();
    let mut transport = |bytes: &[u8]| -> Result<(), TransportError> {
      sent.extend_from_slice(bytes);
      Ok(())
    };
    assert_eq!(transport.send(&[0xf1, 0x23]), Ok(()));
    assert_eq!(sent, vec![0xf1, 0x23]);
  }

  #[test]
  fn ring_buffer_writes_whole_messages() {
    let (producer, mut consumer) = RingBuffer::<u8>::new(3).split();
    let mut transport = RingBufferTransport::from(producer);

    assert_eq!(transport.send(&[0xf1, 0x01]), Ok(()));
    assert_eq!(transport.send(&[0xf1, 0x12]), Err(TransportError::Full));
    assert_eq!(consumer.pop(), Some(0xf1));
    assert_eq!(consumer.pop(), Some(0x01));
    assert_eq!(consumer.pop(), None);
  }
}
