use bytes::{Buf, BufMut, Bytes, BytesMut};
use memchr::{memchr, memchr2};
use std::{error::Error as StdError, fmt, str, time::Duration};

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const COLON: u8 = b':';
const NULL: char = '\u{0000}';

/// Inner Error kind that contains possible errors occuring during parsing.
#[derive(Clone, Copy, Debug)]
pub enum Error {
    Utf8(std::str::Utf8Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Utf8(err) => write!(f, "Invalid UTF8: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Utf8(ref err) => Some(err),
        }
    }
}

#[derive(Default)]
struct EventBuilder {
    event_type: Option<String>,
    data: Option<String>,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl EventBuilder {
    pub fn add_field(&mut self, name: &[u8], value_bs: &[u8]) -> Result<(), Error> {
        let value = str::from_utf8(value_bs).map_err(Error::Utf8)?;

        match name {
            b"event" => {
                self.event_type.replace(String::from(value));
            }
            b"data" => {
                // The WHATWG algorithm appends a LF after every data line and strips
                // the last one on dispatch. Pushing the LF before MORE data is the same.
                match &mut self.data {
                    Some(ref mut data) => {
                        data.reserve(value.len() + 1);
                        data.push('\n');
                        data.push_str(value);
                    }

                    None => {
                        self.data = Some(String::from(value));
                    }
                }
            }
            b"id" if value.contains(NULL) => {
                log::warn!("ignoring id field containing NULL");
            }
            b"id" => {
                self.last_event_id = Some(String::from(value));
            }
            b"retry" => match value.parse::<u64>() {
                // Only base 10 digits, so no sign allowed.
                Ok(ms) if value.bytes().all(|b| b.is_ascii_digit()) => {
                    self.retry = Some(Duration::from_millis(ms));
                }
                _ => log::warn!("ignoring retry field with value {:?}", value),
            },
            _ => log::trace!("ignoring unknown field {:?}", String::from_utf8_lossy(name)),
        }

        Ok(())
    }

    /// Blocks without a `data:` field are never dispatched.
    fn ready(&self) -> bool {
        self.data.is_some()
    }

    /// Blank line ending a block with no data. The id is kept for the next event.
    fn discard(&mut self) {
        if let Some(event_type) = self.event_type.take() {
            log::trace!("dropping {:?} block without data", event_type);
        }
    }

    fn build_and_clear(&mut self) -> crate::Event {
        crate::Event {
            event: self.event_type.take(),
            data: self.data.take().unwrap_or_default(),
            last_event_id: self.last_event_id.take(),
        }
    }
}

/// Incremental SSE decoder. Bytes are `put` as they arrive and complete
/// events are pulled with `next`.
#[derive(Default)]
pub struct Parser {
    buf: BytesMut,
    builder: EventBuilder,
    // Last line ended with a CR at the very end of `buf`, a LF may follow
    // in the next chunk.
    skip_lf: bool,
}

impl Parser {
    pub fn put(&mut self, bs: impl Buf) {
        self.buf.put(bs)
    }

    /// Most recent reconnection delay announced by the server.
    pub fn retry(&self) -> Option<Duration> {
        self.builder.retry
    }

    /// Parses lines until an event is complete or the buffer runs out.
    pub fn next(&mut self) -> Option<Result<crate::Event, Error>> {
        while let Some(line) = self.parse_line() {
            if line.is_empty() {
                if self.builder.ready() {
                    let ev = self.builder.build_and_clear();
                    log::trace!("dispatching event {:?}", ev.event);
                    return Some(Ok(ev));
                }
                self.builder.discard();
                continue;
            }

            match memchr(COLON, &line) {
                // Lines beginning with colon are comments.
                Some(0) => {
                    continue;
                }

                Some(i) => {
                    let name = &line[0..i];

                    // Drop a single SPACE immediately after the colon.
                    let value = if i + 1 < line.len() && line[i + 1] == b' ' {
                        &line[i + 2..]
                    } else {
                        &line[i + 1..]
                    };

                    if let Err(err) = self.builder.add_field(name, value) {
                        return Some(Err(err));
                    }
                }

                None => {
                    if let Err(err) = self.builder.add_field(&line[..], &[][..]) {
                        return Some(Err(err));
                    }
                }
            }
        }

        None
    }

    fn parse_line(&mut self) -> Option<Bytes> {
        // A line ends with CRLF, a lone LF or a lone CR.
        if self.skip_lf && !self.buf.is_empty() {
            if self.buf[0] == LF {
                self.buf.advance(1);
            }
            self.skip_lf = false;
        }

        let i = memchr2(CR, LF, &self.buf)?;
        let line = self.buf.split_to(i);

        if self.buf[0] == CR {
            match self.buf.get(1) {
                Some(&LF) => self.buf.advance(2),
                Some(_) => self.buf.advance(1),
                None => {
                    self.buf.advance(1);
                    self.skip_lf = true;
                }
            }
        } else {
            self.buf.advance(1);
        }

        Some(line.freeze())
    }

    #[cfg(test)]
    /// Helper fn for tests.
    fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl From<&[u8]> for Parser {
    fn from(b: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(b),
            ..Self::default()
        }
    }
}

impl From<&str> for Parser {
    fn from(s: &str) -> Self {
        Self {
            buf: BytesMut::from(s),
            ..Self::default()
        }
    }
}
