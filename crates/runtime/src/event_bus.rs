use foundation::math::GeoCoordinate;

use crate::animation::TaskId;
use crate::frame::Frame;

/// Notifications raised while camera flights run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobeEvent {
    FlightStarted { task: TaskId, target: GeoCoordinate },
    PhaseEntered { task: TaskId, phase: &'static str },
    FlightCompleted { task: TaskId, target: GeoCoordinate },
    /// A newer flight cancelled this one before it finished.
    FlightSuperseded { task: TaskId, target: GeoCoordinate },
    /// A request was dropped because another flight was active.
    FlightIgnored { target: GeoCoordinate },
    /// The camera has settled over `0`; consumers highlight its pin.
    PinAnimated(GeoCoordinate),
}

impl GlobeEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GlobeEvent::FlightStarted { .. } => "flight_started",
            GlobeEvent::PhaseEntered { .. } => "phase_entered",
            GlobeEvent::FlightCompleted { .. } => "flight_completed",
            GlobeEvent::FlightSuperseded { .. } => "flight_superseded",
            GlobeEvent::FlightIgnored { .. } => "flight_ignored",
            GlobeEvent::PinAnimated(_) => "pin_animated",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: GlobeEvent,
}

type Listener = Box<dyn FnMut(&Event)>;

/// Ordered event log with synchronous fan-out to listeners.
///
/// Listeners run in subscription order, before the event is appended to the
/// log.
#[derive(Default)]
pub struct EventBus {
    events: Vec<Event>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.events)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, frame: Frame, kind: GlobeEvent) {
        let event = Event {
            frame_index: frame.index,
            kind,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use foundation::math::GeoCoordinate;

    use super::{EventBus, GlobeEvent};
    use crate::frame::Frame;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::new(2, 0.1);
        bus.emit(f, GlobeEvent::PinAnimated(GeoCoordinate::new(1.0, 2.0)));
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
        assert_eq!(bus.events()[0].kind.kind(), "pin_animated");
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(
            Frame::new(0, 1.0),
            GlobeEvent::FlightIgnored {
                target: GeoCoordinate::new(0.0, 0.0),
            },
        );
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }

    #[test]
    fn every_listener_sees_every_event() {
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(0usize));

        let mut bus = EventBus::new();
        let a = Rc::clone(&seen_a);
        bus.subscribe(move |e| {
            if let GlobeEvent::PinAnimated(coord) = e.kind {
                a.borrow_mut().push(coord);
            }
        });
        let b = Rc::clone(&seen_b);
        bus.subscribe(move |_| *b.borrow_mut() += 1);

        let paris = GeoCoordinate::new(48.85, 2.35);
        bus.emit(Frame::new(0, 1.0), GlobeEvent::PinAnimated(paris));
        bus.emit(
            Frame::new(1, 1.0),
            GlobeEvent::FlightIgnored { target: paris },
        );

        assert_eq!(*seen_a.borrow(), vec![paris]);
        assert_eq!(*seen_b.borrow(), 2);
    }
}
