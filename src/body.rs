use futures_core::{FusedStream, Stream};
use std::{
    error::Error as StdError,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use crate::{parser::Parser, Error, Event};

/// Stream of SSE events decoded from a stream of byte chunks.
pub struct SseBody<S> {
    inner: S,

    parser: Parser,

    done: bool,
}

impl<S> SseBody<S> {
    /// Reconnection delay most recently announced with a `retry:` field.
    pub fn retry(&self) -> Option<Duration> {
        self.parser.retry()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B, E> Stream for SseBody<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
    E: StdError,
{
    type Item = Result<Event, Error>;

    fn poll_next(mut self: Pin<&mut Self>, ctx: &mut Context) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        // Drain whatever the parser already holds before asking for more bytes.
        loop {
            match self.parser.next() {
                Some(Ok(ev)) => return Poll::Ready(Some(Ok(ev))),
                Some(Err(err)) => return Poll::Ready(Some(Err(Error::parser(err)))),
                None => (),
            }

            match Pin::new(&mut self.inner).poll_next(ctx) {
                Poll::Ready(Some(Err(err))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(Error::inner(err))));
                }
                Poll::Ready(None) => {
                    self.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(bs))) => self.parser.put(bs),
            }
        }
    }
}

impl<S, B, E> FusedStream for SseBody<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
    E: StdError,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<S, B, E> From<S> for SseBody<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
    E: StdError,
{
    fn from(inner: S) -> Self {
        Self {
            inner,
            parser: Parser::default(),
            done: false,
        }
    }
}
