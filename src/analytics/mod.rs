//! Analytics event dispatch.
//!
//! Call sites emit events through an [`EventSink`]; what happens to them is
//! decided by whichever handler is currently configured.

pub mod handlers;
pub mod sink;

// Re-export commonly used types
pub use handlers::{
    channel_handler, read_recorded_events, ChannelHandler, EventSummary, FanOut,
    JsonLinesHandler, RecordedEvent,
};
pub use sink::{
    attributes, create_shared_sink, Attributes, DefaultHandler, Event, EventHandler, EventSink,
    SharedEventSink,
};
