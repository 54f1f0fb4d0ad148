use std::fmt::{Debug, Formatter};

use ringbuf::Producer;
use tracing::warn;

use crate::mtc::decoder::ReceiverEvent;

/// Where a [`crate::mtc::Receiver`] delivers its reports.
///
/// Reports are delivered with the receiver locked, so a callback that calls back
/// into the same receiver deadlocks.
pub enum ReceiverHandler {
  Callback(Box<dyn FnMut(ReceiverEvent) + Send + 'static>),
  RingBuffer(Producer<ReceiverEvent>),
}

impl ReceiverHandler {
  pub(crate) fn call(&mut self, event: ReceiverEvent) {
    match self {
      ReceiverHandler::Callback(ref mut callback) => (callback)(event),
      ReceiverHandler::RingBuffer(ref mut producer) => {
        if let Err(event) = producer.push(event) {
          warn!(?event, "Receiver ring buffer is full, dropping report");
        }
      }
    };
  }
}

impl<F> From<F> for ReceiverHandler
where
  F: FnMut(ReceiverEvent) + Send + 'static,
{
  fn from(callback: F) -> Self {
    ReceiverHandler::Callback(Box::new(callback))
  }
}

impl From<Producer<ReceiverEvent>> for ReceiverHandler {
  fn from(producer: Producer<ReceiverEvent>) -> Self {
    ReceiverHandler::RingBuffer(producer)
  }
}

impl Debug for ReceiverHandler {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Callback(_) => write!(f, "Callback"),
      Self::RingBuffer(_) => write!(f, "RingBuffer"),
    }
  }
}
