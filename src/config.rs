use std::collections::BTreeSet;

/// Events inspected when nothing else is asked for.
pub const DEFAULT_MAX_EVENTS: usize = 5;
/// Characters kept from the pretty printed value of a watched field.
pub const FIELD_PREVIEW_LEN: usize = 500;
/// Characters kept from a payload that is not JSON.
pub const RAW_PREVIEW_LEN: usize = 200;

/// Fields of the live timing feed that are worth a closer look.
pub const DEFAULT_WATCHED_FIELDS: [&str; 3] = ["raceControlMessages", "positionData", "sessionInfo"];

/// Settings for an inspection run.
///
/// `max_events` is only validated once the config is handed to a
/// [`Classifier`](crate::Classifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_events: usize,
    pub watched_fields: BTreeSet<String>,
    pub field_preview_len: usize,
    pub raw_preview_len: usize,
}

impl Config {
    /// A config with no watched fields.
    pub fn new(max_events: usize) -> Self {
        Self {
            max_events,
            watched_fields: BTreeSet::new(),
            field_preview_len: FIELD_PREVIEW_LEN,
            raw_preview_len: RAW_PREVIEW_LEN,
        }
    }

    pub fn watch(mut self, field: impl Into<String>) -> Self {
        self.watched_fields.insert(field.into());
        self
    }

    pub fn watch_all<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.watched_fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EVENTS).watch_all(DEFAULT_WATCHED_FIELDS)
    }
}
