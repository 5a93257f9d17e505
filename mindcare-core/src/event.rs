//! Per-request response record. Lives for one request/response cycle only.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::classifier::MatchSource;
use crate::selector::Selection;
use crate::topic::Topic;

/// Which path produced the reply.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePath {
    Oracle,
    Fallback,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseEvent {
    pub message: String,
    /// `None` when the oracle answered.
    pub topic: Option<Topic>,
    pub source: Option<MatchSource>,
    pub template_index: Option<usize>,
    pub path: ResponsePath,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseEvent {
    pub fn from_oracle(message: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            topic: None,
            source: None,
            template_index: None,
            path: ResponsePath::Oracle,
            response: response.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_selection(
        message: impl Into<String>,
        source: MatchSource,
        selection: Selection,
    ) -> Self {
        Self {
            message: message.into(),
            topic: Some(selection.topic),
            source: Some(source),
            template_index: Some(selection.index),
            path: ResponsePath::Fallback,
            response: selection.text.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn used_oracle(&self) -> bool {
        self.path == ResponsePath::Oracle
    }

    /// ISO-8601 with millisecond precision, e.g. `2026-02-19T12:00:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_event_carries_topic_and_index() {
        let sel = Selection {
            topic: Topic::Sleep,
            index: 1,
            text: Topic::Sleep.templates()[1],
        };
        let ev = ResponseEvent::from_selection("can't sleep", MatchSource::Message, sel);
        assert!(!ev.used_oracle());
        assert_eq!(ev.topic, Some(Topic::Sleep));
        assert_eq!(ev.template_index, Some(1));
        assert_eq!(ev.response, Topic::Sleep.templates()[1]);
    }

    #[test]
    fn test_oracle_event_has_no_topic() {
        let ev = ResponseEvent::from_oracle("hi", "Hello from the model");
        assert!(ev.used_oracle());
        assert_eq!(ev.topic, None);
        assert_eq!(ev.template_index, None);
    }

    #[test]
    fn test_timestamp_iso_format() {
        let mut ev = ResponseEvent::from_oracle("x", "y");
        ev.timestamp = Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap();
        assert_eq!(ev.timestamp_iso(), "2026-02-19T12:00:00.000Z");
    }
}
