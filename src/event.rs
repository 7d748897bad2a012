/// A single decoded SSE event, before its data is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    /// Value of the `event:` field, `None` when the block had none.
    pub event: Option<String>,
    pub data: String,
    pub last_event_id: Option<String>,
}

impl Event {
    /// Event carrying only a data payload.
    pub fn data(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            last_event_id: None,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }
}
