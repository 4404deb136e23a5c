//! Concrete event handlers.
//!
//! - [`ChannelHandler`] forwards events into a bounded channel without blocking
//! - [`JsonLinesHandler`] appends events to a JSON Lines file
//! - [`FanOut`] dispatches one event to several handlers

use crate::analytics::sink::{Attributes, Event, EventHandler};
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Forwards events into a bounded crossbeam channel.
///
/// Uses `try_send`, so dispatch never blocks: when the channel is full or the
/// receiver is gone the event is dropped and a warning is logged.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    sender: Sender<Event>,
}

impl ChannelHandler {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

impl EventHandler for ChannelHandler {
    fn handle(&self, name: &str, attributes: &Attributes) {
        match self.sender.try_send(Event::new(name, attributes.clone())) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(event = %event.name, "event channel full, dropping event");
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::warn!(event = %event.name, "event receiver gone, dropping event");
            }
        }
    }
}

/// Create a channel handler and the receiver it feeds.
pub fn channel_handler(capacity: usize) -> (ChannelHandler, Receiver<Event>) {
    let (sender, receiver) = bounded(capacity);
    (ChannelHandler::new(sender), receiver)
}

/// One event as written by [`JsonLinesHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Unique id of this record
    pub id: Uuid,
    /// When the event was dispatched
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub attributes: Attributes,
}

impl RecordedEvent {
    /// Stamp an event with a fresh id and the current time.
    pub fn now(name: &str, attributes: &Attributes) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            name: name.to_string(),
            attributes: attributes.clone(),
        }
    }
}

/// Appends every event to a JSON Lines file.
///
/// Write failures are logged and the event is dropped.
#[derive(Debug)]
pub struct JsonLinesHandler {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesHandler {
    /// Open (or create) the log file for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &RecordedEvent) -> Result<(), std::io::Error> {
        let mut line = serde_json::to_string(record).map_err(std::io::Error::other)?;
        line.push('\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

impl EventHandler for JsonLinesHandler {
    fn handle(&self, name: &str, attributes: &Attributes) {
        let record = RecordedEvent::now(name, attributes);
        if let Err(e) = self.append(&record) {
            tracing::warn!(path = ?self.path, event = name, "failed to record event: {e}");
        }
    }
}

/// Read every event from a JSON Lines log.
///
/// A missing file yields no events. Lines that fail to parse are skipped with a
/// warning.
pub fn read_recorded_events(path: &Path) -> Result<Vec<RecordedEvent>, std::io::Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RecordedEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(path = ?path, line = index + 1, "skipping malformed event: {e}"),
        }
    }
    Ok(events)
}

/// Per-name counts over a set of recorded events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub total: usize,
    pub by_name: BTreeMap<String, usize>,
    pub first: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
}

impl EventSummary {
    pub fn from_events(events: &[RecordedEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.total += 1;
            *summary.by_name.entry(event.name.clone()).or_insert(0) += 1;
            summary.first = Some(summary.first.map_or(event.timestamp, |t| t.min(event.timestamp)));
            summary.last = Some(summary.last.map_or(event.timestamp, |t| t.max(event.timestamp)));
        }
        summary
    }

    /// Get a summary string for display.
    pub fn render(&self) -> String {
        if self.total == 0 {
            return "No events recorded.".to_string();
        }

        let mut out = format!("Recorded events: {}\n", self.total);
        for (name, count) in &self.by_name {
            out.push_str(&format!("  - {name}: {count}\n"));
        }
        if let (Some(first), Some(last)) = (self.first, self.last) {
            out.push_str(&format!(
                "First: {}\nLast:  {}",
                first.format("%Y-%m-%d %H:%M:%S UTC"),
                last.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        out
    }
}

/// Dispatches each event to every wrapped handler, in order.
#[derive(Clone, Default)]
pub struct FanOut {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl FanOut {
    pub fn new(handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        Self { handlers }
    }

    pub fn push(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl EventHandler for FanOut {
    fn handle(&self, name: &str, attributes: &Attributes) {
        for handler in &self.handlers {
            handler.handle(name, attributes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::sink::{attributes, EventSink};

    fn temp_log() -> PathBuf {
        std::env::temp_dir()
            .join(format!("betakit-handlers-{}", Uuid::new_v4()))
            .join("events.jsonl")
    }

    #[test]
    fn test_channel_handler_forwards() {
        let (handler, rx) = channel_handler(4);
        let sink = EventSink::with_handler(handler);

        sink.log_event("Test.Event", attributes([("key", "value")]));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.name, "Test.Event");
        assert_eq!(event.attributes.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_channel_handler_drops_when_full() {
        let (handler, rx) = channel_handler(1);

        handler.handle("first", &Attributes::new());
        handler.handle("second", &Attributes::new());

        assert_eq!(rx.len(), 1);
        assert_eq!(rx.try_recv().unwrap().name, "first");
    }

    #[test]
    fn test_json_lines_round_trip() {
        let path = temp_log();
        let handler = JsonLinesHandler::open(&path).unwrap();
        assert_eq!(handler.path(), path.as_path());

        handler.handle("TestFlight.Feedback.View", &attributes([("questionId", "q1")]));
        handler.handle("TestFlight.Feedback.Skip", &attributes([("reason", "skip")]));
        handler.handle("TestFlight.Feedback.View", &attributes([("questionId", "q2")]));

        let events = read_recorded_events(&path).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].attributes["reason"], "skip");

        let summary = EventSummary::from_events(&events);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_name["TestFlight.Feedback.View"], 2);
        assert!(summary.first <= summary.last);
        assert!(summary.render().contains("TestFlight.Feedback.Skip: 1"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_read_missing_file() {
        let events = read_recorded_events(&temp_log()).unwrap();
        assert!(events.is_empty());
        assert_eq!(EventSummary::from_events(&events).render(), "No events recorded.");
    }

    #[test]
    fn test_fan_out_reaches_every_handler() {
        let (first, rx1) = channel_handler(4);
        let (second, rx2) = channel_handler(4);
        let fan_out = FanOut::new(vec![
            Arc::new(first) as Arc<dyn EventHandler>,
            Arc::new(second) as Arc<dyn EventHandler>,
        ]);
        assert_eq!(fan_out.len(), 2);

        fan_out.handle("Both", &Attributes::new());

        assert_eq!(rx1.try_recv().unwrap().name, "Both");
        assert_eq!(rx2.try_recv().unwrap().name, "Both");
    }

    #[test]
    fn test_fan_out_push_appends_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let tagged = |tag: &'static str| {
            let tx = tx.clone();
            Arc::new(move |name: &str, _: &Attributes| {
                let _ = tx.send(format!("{tag}:{name}"));
            })
        };

        let mut fan_out = FanOut::default();
        assert!(fan_out.is_empty());
        fan_out.push(tagged("first"));
        fan_out.push(tagged("second"));
        assert_eq!(fan_out.len(), 2);

        let sink = EventSink::with_handler(fan_out);
        sink.log_event("Pushed", Attributes::new());

        let seen: Vec<String> = rx.try_iter().collect();
        assert_eq!(seen, vec!["first:Pushed", "second:Pushed"]);
    }
}
