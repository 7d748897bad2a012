//! Inspect a stream of server-sent events.
//!
//! Bytes from any transport are decoded into [`Event`]s with [`Sse::into_sse`],
//! then [`inspect`] summarizes the JSON payload of the first few of them,
//! dropping the transport once enough have been seen.
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use sse_inspect::{inspect, Sse};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let response = reqwest::get("http://127.0.0.1:8080/v1/live/sse").await?;
//! let events = Box::pin(response.bytes_stream()).into_sse();
//!
//! let mut results = inspect(events, 5, ["sessionInfo"])?;
//! while let Some(result) = results.next().await {
//!     println!("{}", result?);
//! }
//! # Ok(())
//! # }
//! ```
use futures_core::Stream;
use std::error::Error as StdError;

mod body;
mod config;
mod error;
mod event;
mod inspect;
mod parser;
mod result;

pub use {
    body::SseBody,
    config::{
        Config, DEFAULT_MAX_EVENTS, DEFAULT_WATCHED_FIELDS, FIELD_PREVIEW_LEN, RAW_PREVIEW_LEN,
    },
    error::{Error, ErrorKind},
    event::Event,
    inspect::{inspect, inspect_iter, Classifier, InspectIter, InspectStream},
    result::{InspectionResult, Payload, DEFAULT_EVENT_TYPE},
};

/// Decode a stream of byte chunks as SSE.
pub trait Sse: Sized {
    fn into_sse(self) -> SseBody<Self>;
}

impl<S, B, E> Sse for S
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
    E: StdError,
{
    fn into_sse(self) -> SseBody<Self> {
        SseBody::from(self)
    }
}

/// Inspect a stream of events using a full [`Config`].
pub trait IntoInspection: Sized {
    fn into_inspection(self, config: Config) -> Result<InspectStream<Self>, Error>;
}

impl<S, E> IntoInspection for S
where
    S: Stream<Item = Result<Event, E>> + Unpin,
{
    fn into_inspection(self, config: Config) -> Result<InspectStream<Self>, Error> {
        InspectStream::new(self, config)
    }
}
