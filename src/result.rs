use std::{collections::BTreeMap, fmt};

/// What the inspector made of an event's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Data was a JSON object.
    Parsed {
        /// Top level keys, in the order they appeared. Empty for `{}`.
        keys: Vec<String>,
        /// Truncated pretty printed value of every watched key present.
        matched: BTreeMap<String, String>,
    },
    /// Data was not a JSON object.
    Unparsed {
        raw_preview: String,
        reason: String,
    },
}

/// Summary of one inspected event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionResult {
    /// Position of the event in the inspected stream, starting at 1.
    pub sequence: u64,
    pub event_type: Option<String>,
    pub payload: Payload,
}

impl InspectionResult {
    /// Top level keys, empty when the data failed to parse.
    pub fn parsed_keys(&self) -> &[String] {
        match &self.payload {
            Payload::Parsed { keys, .. } => keys,
            Payload::Unparsed { .. } => &[],
        }
    }

    pub fn matched_fields(&self) -> Option<&BTreeMap<String, String>> {
        match &self.payload {
            Payload::Parsed { matched, .. } => Some(matched),
            Payload::Unparsed { .. } => None,
        }
    }

    pub fn parse_failed(&self) -> bool {
        matches!(self.payload, Payload::Unparsed { .. })
    }

    pub fn raw_preview(&self) -> Option<&str> {
        match &self.payload {
            Payload::Parsed { .. } => None,
            Payload::Unparsed { raw_preview, .. } => Some(raw_preview),
        }
    }
}

/// Event type of events sent without an `event:` field.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// `raceControlMessages` reads as `Race control messages`.
fn field_label(field: &str) -> String {
    let mut label = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.extend(c.to_lowercase());
        } else {
            label.push(c);
        }
    }
    label
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== Event {} ===", self.sequence)?;
        writeln!(f, "Event type: {}", self.event_type.as_deref().unwrap_or(DEFAULT_EVENT_TYPE))?;

        match &self.payload {
            Payload::Parsed { keys, matched } => {
                write!(f, "Data keys: {:?}", keys)?;
                for (field, preview) in matched {
                    write!(f, "\n{} found: {}...", field_label(field), preview)?;
                }
                Ok(())
            }
            Payload::Unparsed { raw_preview, .. } => write!(f, "Raw data: {}...", raw_preview),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parsed() {
        let result = InspectionResult {
            sequence: 1,
            event_type: Some("message".into()),
            payload: Payload::Parsed {
                keys: vec!["a".into(), "b".into()],
                matched: BTreeMap::from([("a".to_string(), "1".to_string())]),
            },
        };

        assert_eq!(
            result.to_string(),
            "=== Event 1 ===\nEvent type: message\nData keys: [\"a\", \"b\"]\nA found: 1..."
        );
    }

    #[test]
    fn display_labels_watched_fields() {
        let result = InspectionResult {
            sequence: 2,
            event_type: None,
            payload: Payload::Parsed {
                keys: vec!["raceControlMessages".into(), "sessionInfo".into()],
                matched: BTreeMap::from([
                    ("raceControlMessages".to_string(), "[]".to_string()),
                    ("sessionInfo".to_string(), "{}".to_string()),
                ]),
            },
        };

        assert_eq!(
            result.to_string(),
            "=== Event 2 ===\nEvent type: message\nData keys: [\"raceControlMessages\", \"sessionInfo\"]\n\
             Race control messages found: []...\nSession info found: {}..."
        );
    }

    #[test]
    fn field_label_splits_camel_case() {
        assert_eq!(field_label("positionData"), "Position data");
        assert_eq!(field_label("a"), "A");
        assert_eq!(field_label(""), "");
    }

    #[test]
    fn display_unparsed() {
        let result = InspectionResult {
            sequence: 3,
            event_type: None,
            payload: Payload::Unparsed {
                raw_preview: "{not json".into(),
                reason: "EOF while parsing an object at line 1 column 9".into(),
            },
        };

        assert_eq!(
            result.to_string(),
            "=== Event 3 ===\nEvent type: message\nRaw data: {not json..."
        );
        assert!(result.parse_failed());
        assert!(result.parsed_keys().is_empty());
        assert_eq!(result.matched_fields(), None);
    }
}
