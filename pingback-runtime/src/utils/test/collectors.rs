use crate::event::{Event, EventLog};
use crate::sink::ChannelSink;
use crossbeam::crossbeam_channel::Receiver;
use std::sync::Mutex;

/// Event log that keeps every event in memory so tests can compare them afterwards.
#[derive(Debug, Default)]
pub struct RecordingLog {
    events: Mutex<Vec<Event>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        RecordingLog::default()
    }

    /// Snapshot of the events logged so far, oldest first.
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl EventLog for RecordingLog {
    fn log(&self, event: &Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(*event),
            Err(poisoned) => poisoned.into_inner().push(*event),
        }
    }
}

/// A sink whose frames can be pulled out of the returned receiver.
pub fn channel_sink() -> (ChannelSink, Receiver<Vec<u8>>) {
    ChannelSink::unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::FrameSink;

    #[test]
    fn records_in_order() {
        let log = RecordingLog::new();
        log.log(&Event::IcmpPing);
        log.log(&Event::IcmpPong);
        assert_eq!(log.events(), vec![Event::IcmpPing, Event::IcmpPong]);

        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn channel_sink_collects() {
        let (sink, frames) = channel_sink();
        sink.transmit(&[1, 2]).unwrap();
        drop(sink);
        assert_eq!(frames.iter().collect::<Vec<_>>(), vec![vec![1, 2]]);
    }
}
