use crate::frame::Frame;

/// Structured notification emitted by dashboard state changes.
///
/// The host page drains these once per frame and mirrors them into the DOM,
/// so the kinds are stable strings rather than an enum the page cannot see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub detail: String,
}

/// Active variable changed (detail is the new key).
pub const EVENT_SELECTION: &str = "selection-changed";
/// Cell values replaced (detail is a short description of the source).
pub const EVENT_DATA: &str = "data-changed";
/// Model run finished or failed (detail is the user-facing message).
pub const EVENT_MODEL: &str = "model-run";

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, detail: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            detail: detail.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Takes all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EVENT_SELECTION, EventBus};
    use crate::frame::Frame;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::first().advance(0.016).advance(0.016);
        bus.emit(f, EVENT_SELECTION, "phAvg");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
        assert_eq!(bus.events()[0].detail, "phAvg");
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Frame::first(), EVENT_SELECTION, "dic");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
