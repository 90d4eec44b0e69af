use std::collections::VecDeque;

use foundation::math::GeoCoordinate;
use runtime::{EventBus, Frame, GlobeEvent, Scheduler, TaskId};
use tracing::{debug, info, warn};

use crate::camera::CameraRig;
use crate::fly_to::FlyTo;

/// Camera distance beyond which "check weather" flies in before fetching.
pub const NEAR_ENOUGH_DISTANCE: f64 = 140.0;

/// Whether the camera must fly in before showing data for a location.
pub fn needs_fly(camera_distance: f64) -> bool {
    camera_distance > NEAR_ENOUGH_DISTANCE
}

/// What to do when a flight is requested while another is in progress.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FlightPolicy {
    /// Cancel the active flight and start the new one.
    #[default]
    SupersedePrevious,
    /// Drop the new request.
    IgnoreNew,
    /// Start the new request once the active flight completes.
    Queue,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlightRequest {
    Started(TaskId),
    Queued { position: usize },
    Ignored,
}

struct PendingFlight {
    target: GeoCoordinate,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl PendingFlight {
    fn into_animation(self) -> FlyTo {
        let fly = FlyTo::new(self.target);
        match self.on_complete {
            Some(on_complete) => fly.with_on_complete(on_complete),
            None => fly,
        }
    }
}

/// Owns camera flights for one rendering surface and enforces a
/// [`FlightPolicy`] so at most one flight writes to the camera at a time.
pub struct FlightDirector<R> {
    scheduler: Scheduler<R>,
    policy: FlightPolicy,
    active: Option<(TaskId, GeoCoordinate)>,
    queue: VecDeque<PendingFlight>,
}

impl<R: CameraRig> Default for FlightDirector<R> {
    fn default() -> Self {
        Self::new(FlightPolicy::default())
    }
}

impl<R: CameraRig> FlightDirector<R> {
    pub fn new(policy: FlightPolicy) -> Self {
        Self {
            scheduler: Scheduler::new(),
            policy,
            active: None,
            queue: VecDeque::new(),
        }
    }

    pub fn policy(&self) -> FlightPolicy {
        self.policy
    }

    pub fn is_flying(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_target(&self) -> Option<GeoCoordinate> {
        self.active.map(|(_, target)| target)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn fly_to(
        &mut self,
        target: GeoCoordinate,
        frame: Frame,
        bus: &mut EventBus,
    ) -> FlightRequest {
        self.request(
            PendingFlight {
                target,
                on_complete: None,
            },
            frame,
            bus,
        )
    }

    pub fn fly_to_then(
        &mut self,
        target: GeoCoordinate,
        on_complete: impl FnOnce() + 'static,
        frame: Frame,
        bus: &mut EventBus,
    ) -> FlightRequest {
        self.request(
            PendingFlight {
                target,
                on_complete: Some(Box::new(on_complete)),
            },
            frame,
            bus,
        )
    }

    /// Cancels the active flight and anything queued behind it.
    pub fn cancel_all(&mut self, frame: Frame, bus: &mut EventBus) {
        self.queue.clear();
        if let Some((task, _)) = self.active.take() {
            self.scheduler.cancel(task, frame, bus);
        }
    }

    /// Advances the active flight by one frame.
    ///
    /// Returns the task that completed this frame, if any.
    pub fn tick(&mut self, frame: Frame, rig: &mut R, bus: &mut EventBus) -> Option<TaskId> {
        let summary = self.scheduler.run_frame(frame, rig, bus);
        let (task, target) = self.active?;
        if !summary.finished.contains(&task) {
            return None;
        }

        info!(
            %task,
            lat = target.latitude,
            lng = target.longitude,
            "flight completed"
        );
        self.active = None;
        if let Some(next) = self.queue.pop_front() {
            self.start(next, frame, bus);
        }
        Some(task)
    }

    fn request(
        &mut self,
        flight: PendingFlight,
        frame: Frame,
        bus: &mut EventBus,
    ) -> FlightRequest {
        let Some((active_task, _)) = self.active else {
            return FlightRequest::Started(self.start(flight, frame, bus));
        };

        match self.policy {
            FlightPolicy::SupersedePrevious => {
                warn!(%active_task, "flight superseded by a new request");
                self.scheduler.cancel(active_task, frame, bus);
                self.active = None;
                FlightRequest::Started(self.start(flight, frame, bus))
            }
            FlightPolicy::IgnoreNew => {
                debug!(
                    lat = flight.target.latitude,
                    lng = flight.target.longitude,
                    "flight request ignored"
                );
                bus.emit(
                    frame,
                    GlobeEvent::FlightIgnored {
                        target: flight.target,
                    },
                );
                FlightRequest::Ignored
            }
            FlightPolicy::Queue => {
                self.queue.push_back(flight);
                FlightRequest::Queued {
                    position: self.queue.len(),
                }
            }
        }
    }

    fn start(&mut self, flight: PendingFlight, frame: Frame, bus: &mut EventBus) -> TaskId {
        let target = flight.target;
        let task = self.scheduler.spawn(flight.into_animation());
        info!(
            %task,
            lat = target.latitude,
            lng = target.longitude,
            "flight started"
        );
        bus.emit(frame, GlobeEvent::FlightStarted { task, target });
        self.active = Some((task, target));
        task
    }
}
