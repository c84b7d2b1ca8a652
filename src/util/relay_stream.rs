use std::{
  pin::Pin,
  task::{Context, Poll},
};

use bytes::Bytes;
use futures::Stream;
use tracing::{info, warn};

use crate::{Error, Result};

/// Forwards an upstream byte stream chunk by chunk and keeps count.
///
/// Dropping it before the upstream finished (the client went away) drops the
/// upstream stream with it, which releases the upstream connection.
pub struct RelayStream<T> {
  stream: T,
  label: String,
  relayed: u64,
  done: bool,
}

impl<T> RelayStream<T> {
  pub fn new(stream: T, label: impl Into<String>) -> Self {
    RelayStream {
      stream,
      label: label.into(),
      relayed: 0,
      done: false,
    }
  }
}

impl<T, E> Stream for RelayStream<T>
where
  T: Stream<Item = Result<Bytes, E>> + Unpin,
  E: Into<Error>,
{
  type Item = Result<Bytes>;

  fn poll_next(
    mut self: Pin<&mut Self>,
    cx: &mut Context<'_>,
  ) -> Poll<Option<Self::Item>> {
    let this = &mut *self;
    if this.done {
      return Poll::Ready(None);
    }

    match Pin::new(&mut this.stream).poll_next(cx) {
      Poll::Ready(Some(Ok(bytes))) => {
        this.relayed += bytes.len() as u64;
        Poll::Ready(Some(Ok(bytes)))
      }
      Poll::Ready(Some(Err(err))) => {
        let err = err.into();
        this.done = true;
        warn!(
          relay = %this.label,
          bytes = this.relayed,
          error = %err,
          "upstream failed mid-stream"
        );
        Poll::Ready(Some(Err(err)))
      }
      Poll::Ready(None) => {
        this.done = true;
        info!(relay = %this.label, bytes = this.relayed, "relay finished");
        Poll::Ready(None)
      }
      Poll::Pending => Poll::Pending,
    }
  }
}

impl<T> Drop for RelayStream<T> {
  fn drop(&mut self) {
    if !self.done {
      info!(
        relay = %self.label,
        bytes = self.relayed,
        "client went away, cancelling upstream"
      );
    }
  }
}
