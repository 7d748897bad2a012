use futures_core::{FusedStream, Stream};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{Config, Error, Event, InspectionResult, Payload};

/// Turns raw events into numbered [`InspectionResult`]s.
///
/// Owns the sequence counter, so each inspection run needs its own.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: Config,
    seen: u64,
}

impl Classifier {
    /// Fails with [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument)
    /// when `config.max_events` is 0.
    pub fn new(config: Config) -> Result<Self, Error> {
        if config.max_events < 1 {
            return Err(Error::invalid_argument("max_events must be at least 1"));
        }

        Ok(Self { config, seen: 0 })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of events classified so far.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Events that may still be classified before the limit is hit.
    pub fn remaining(&self) -> usize {
        self.config
            .max_events
            .saturating_sub(usize::try_from(self.seen).unwrap_or(usize::MAX))
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Any JSON object counts as parsed, so `{}` yields a parsed result
    /// with no keys. Everything else is [`Payload::Unparsed`].
    pub fn classify(&mut self, event: Event) -> InspectionResult {
        self.seen += 1;

        let payload = match serde_json::from_str::<Value>(&event.data) {
            Ok(Value::Object(object)) => {
                let matched = object
                    .iter()
                    .filter(|(key, _)| self.config.watched_fields.contains(key.as_str()))
                    .map(|(key, value)| (key.clone(), self.preview_value(value)))
                    .collect::<BTreeMap<_, _>>();

                Payload::Parsed {
                    keys: object.keys().cloned().collect(),
                    matched,
                }
            }
            Ok(_) => self.unparsed(&event.data, "expected a JSON object".to_string()),
            Err(err) => self.unparsed(&event.data, err.to_string()),
        };

        InspectionResult {
            sequence: self.seen,
            event_type: event.event,
            payload,
        }
    }

    fn preview_value(&self, value: &Value) -> String {
        // Serializing a Value can't fail: every map key is already a string.
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        truncate(&pretty, self.config.field_preview_len)
    }

    fn unparsed(&self, data: &str, reason: String) -> Payload {
        log::debug!("event {} is not a JSON object: {}", self.seen, reason);
        Payload::Unparsed {
            raw_preview: truncate(data, self.config.raw_preview_len),
            reason,
        }
    }
}

/// First `max` characters of `s`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => s[..i].to_string(),
        None => s.to_string(),
    }
}

/// Stream of inspection results over a stream of events.
///
/// The upstream is dropped as soon as the limit is reached or it yields an
/// error, which releases whatever connection backs it.
pub struct InspectStream<S> {
    inner: Option<S>,
    classifier: Classifier,
}

impl<S> InspectStream<S> {
    pub fn new(inner: S, config: Config) -> Result<Self, Error> {
        Ok(Self {
            inner: Some(inner),
            classifier: Classifier::new(config)?,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn release(&mut self) {
        if self.inner.take().is_some() {
            log::debug!(
                "releasing event source after {} events",
                self.classifier.seen()
            );
        }
    }
}

impl<S, E> Stream for InspectStream<S>
where
    S: Stream<Item = Result<Event, E>> + Unpin,
{
    type Item = Result<InspectionResult, E>;

    fn poll_next(mut self: Pin<&mut Self>, ctx: &mut Context) -> Poll<Option<Self::Item>> {
        let inner = match self.inner.as_mut() {
            Some(inner) => inner,
            None => return Poll::Ready(None),
        };

        match Pin::new(inner).poll_next(ctx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => {
                self.release();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(err))) => {
                self.release();
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(Some(Ok(ev))) => {
                let result = self.classifier.classify(ev);
                if self.classifier.is_exhausted() {
                    self.release();
                }
                Poll::Ready(Some(Ok(result)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(_) => (0, Some(self.classifier.remaining())),
            None => (0, Some(0)),
        }
    }
}

impl<S, E> FusedStream for InspectStream<S>
where
    S: Stream<Item = Result<Event, E>> + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

/// Blocking counterpart of [`InspectStream`] over an iterator of events.
pub struct InspectIter<I> {
    inner: Option<I>,
    classifier: Classifier,
}

impl<I> InspectIter<I> {
    pub fn new(inner: I, config: Config) -> Result<Self, Error> {
        Ok(Self {
            inner: Some(inner),
            classifier: Classifier::new(config)?,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

impl<I, E> Iterator for InspectIter<I>
where
    I: Iterator<Item = Result<Event, E>>,
{
    type Item = Result<InspectionResult, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next();

        match item {
            Some(Ok(ev)) => {
                let result = self.classifier.classify(ev);
                if self.classifier.is_exhausted() {
                    log::debug!(
                        "releasing event source after {} events",
                        self.classifier.seen()
                    );
                    self.inner = None;
                }
                Some(Ok(result))
            }
            Some(Err(err)) => {
                self.inner = None;
                Some(Err(err))
            }
            None => {
                self.inner = None;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(_) => (0, Some(self.classifier.remaining())),
            None => (0, Some(0)),
        }
    }
}

impl<I, E> std::iter::FusedIterator for InspectIter<I> where I: Iterator<Item = Result<Event, E>> {}

/// Inspects at most `max_events` events of `events`, previewing the
/// top level keys named in `watched_fields`.
///
/// ```
/// use futures_util::StreamExt;
/// use sse_inspect::{inspect, Event};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let events = futures_util::stream::iter(vec![
///     Ok::<_, std::convert::Infallible>(Event::data(r#"{"a": 1, "b": 2}"#)),
///     Ok(Event::data("{not json")),
/// ]);
///
/// let results: Vec<_> = inspect(events, 5, ["a"]).unwrap().collect().await;
/// assert_eq!(results.len(), 2);
/// # });
/// ```
pub fn inspect<S, I, F>(
    events: S,
    max_events: usize,
    watched_fields: I,
) -> Result<InspectStream<S>, Error>
where
    I: IntoIterator<Item = F>,
    F: Into<String>,
{
    InspectStream::new(events, Config::new(max_events).watch_all(watched_fields))
}

/// Same as [`inspect`] for a blocking source of events.
pub fn inspect_iter<T, I, F>(
    events: T,
    max_events: usize,
    watched_fields: I,
) -> Result<InspectIter<T::IntoIter>, Error>
where
    T: IntoIterator,
    I: IntoIterator<Item = F>,
    F: Into<String>,
{
    InspectIter::new(
        events.into_iter(),
        Config::new(max_events).watch_all(watched_fields),
    )
}
