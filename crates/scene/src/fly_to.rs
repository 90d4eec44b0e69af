//! Three-phase camera flight to a geographic target.
//!
//! 1. `ZoomOut`: straight out to [`ZOOM_OUT_RADIUS`] along the current view
//!    direction, look-at held.
//! 2. `Rotate`: along the great-circle arc to a point above the target while
//!    the look-at slides to the target's projection at the globe centre.
//! 3. `ZoomIn`: straight down to [`ZOOM_IN_RADIUS`] above the target.
//!
//! Each phase begins on the frame its predecessor reaches `t == 1`, and that
//! frame also applies the new phase's `t == 0` pose.

use foundation::math::{GeoCoordinate, Vec3, project};
use foundation::time::Time;
use runtime::{Animation, AnimationStatus, EventBus, Frame, GlobeEvent, TaskId};
use tracing::debug;

use crate::camera::CameraRig;

/// Camera distance from the globe centre at the end of the flight.
pub const ZOOM_IN_RADIUS: f64 = 120.0;
/// Camera distance from the globe centre while travelling.
pub const ZOOM_OUT_RADIUS: f64 = 350.0;
pub const ZOOM_DURATION_MS: f64 = 400.0;
pub const MIN_ROTATE_DURATION_MS: f64 = 250.0;
pub const ROTATE_MS_PER_RADIAN: f64 = 600.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlyPhase {
    ZoomOut,
    Rotate,
    ZoomIn,
    Done,
}

impl FlyPhase {
    pub fn name(self) -> &'static str {
        match self {
            FlyPhase::ZoomOut => "zoom-out",
            FlyPhase::Rotate => "rotate",
            FlyPhase::ZoomIn => "zoom-in",
            FlyPhase::Done => "done",
        }
    }

    fn next(self) -> Self {
        match self {
            FlyPhase::ZoomOut => FlyPhase::Rotate,
            FlyPhase::Rotate => FlyPhase::ZoomIn,
            FlyPhase::ZoomIn | FlyPhase::Done => FlyPhase::Done,
        }
    }
}

/// Rotate-phase duration for an arc between two camera positions.
pub fn rotate_duration_ms(from: Vec3, to: Vec3) -> f64 {
    (from.angle_to(to) * ROTATE_MS_PER_RADIAN).max(MIN_ROTATE_DURATION_MS)
}

/// Where a flight will go and how long each phase lasts, computed up front
/// from the camera position the flight starts at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlightPlan {
    pub zoom_out_end: Vec3,
    pub rotate_end: Vec3,
    pub zoom_in_end: Vec3,
    pub look_at_end: Vec3,
    pub zoom_out_ms: f64,
    pub rotate_ms: f64,
    pub zoom_in_ms: f64,
}

impl FlightPlan {
    pub fn new(camera_position: Vec3, target: GeoCoordinate) -> Self {
        let zoom_out_end = camera_position.with_length(ZOOM_OUT_RADIUS);
        let rotate_end = project(target, ZOOM_OUT_RADIUS, 0.0);
        Self {
            zoom_out_end,
            rotate_end,
            zoom_in_end: project(target, ZOOM_IN_RADIUS, 0.0),
            look_at_end: project(target, 0.0, 0.0),
            zoom_out_ms: ZOOM_DURATION_MS,
            rotate_ms: rotate_duration_ms(zoom_out_end, rotate_end),
            zoom_in_ms: ZOOM_DURATION_MS,
        }
    }

    pub fn total_ms(&self) -> f64 {
        self.zoom_out_ms + self.rotate_ms + self.zoom_in_ms
    }
}

#[derive(Debug, Copy, Clone)]
struct Segment {
    from: Vec3,
    to: Vec3,
    start: Time,
    duration_ms: f64,
}

impl Segment {
    fn progress(&self, now: Time) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (now.millis_since(self.start) / self.duration_ms).min(1.0)
    }
}

/// In-flight state of one camera flight; run it on a
/// [`Scheduler`](runtime::Scheduler) over a [`CameraRig`].
pub struct FlyTo {
    target: GeoCoordinate,
    phase: FlyPhase,
    segment: Option<Segment>,
    start_look_at: Option<Vec3>,
    end_look_at: Vec3,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for FlyTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlyTo")
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl FlyTo {
    pub fn new(target: GeoCoordinate) -> Self {
        Self {
            target,
            phase: FlyPhase::ZoomOut,
            segment: None,
            start_look_at: None,
            end_look_at: project(target, 0.0, 0.0),
            on_complete: None,
        }
    }

    /// `on_complete` runs once, after the final phase. A cancelled flight
    /// never calls it.
    pub fn with_on_complete(mut self, on_complete: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    pub fn target(&self) -> GeoCoordinate {
        self.target
    }

    pub fn phase(&self) -> FlyPhase {
        self.phase
    }

    fn begin_phase(&self, rig: &impl CameraRig, now: Time) -> Segment {
        let from = rig.camera_position();
        let (to, duration_ms) = match self.phase {
            FlyPhase::ZoomOut => (from.with_length(ZOOM_OUT_RADIUS), ZOOM_DURATION_MS),
            FlyPhase::Rotate => {
                let to = project(self.target, ZOOM_OUT_RADIUS, 0.0);
                (to, rotate_duration_ms(from, to))
            }
            FlyPhase::ZoomIn | FlyPhase::Done => {
                (project(self.target, ZOOM_IN_RADIUS, 0.0), ZOOM_DURATION_MS)
            }
        };
        Segment {
            from,
            to,
            start: now,
            duration_ms,
        }
    }

    fn apply(&self, rig: &mut impl CameraRig, segment: &Segment, t: f64, start_look_at: Vec3) {
        match self.phase {
            FlyPhase::ZoomOut => {
                rig.set_camera_position(segment.from.lerp(segment.to, t));
                rig.set_look_at(start_look_at);
            }
            FlyPhase::Rotate => {
                rig.set_camera_position(segment.from.slerp(segment.to, t));
                rig.set_look_at(start_look_at.lerp(self.end_look_at, t));
            }
            FlyPhase::ZoomIn => {
                rig.set_camera_position(segment.from.lerp(segment.to, t));
                rig.set_look_at(self.end_look_at);
            }
            FlyPhase::Done => {}
        }
    }

    fn finish(&mut self, task: TaskId, frame: Frame, bus: &mut EventBus) {
        bus.emit(frame, GlobeEvent::PinAnimated(self.target));
        bus.emit(
            frame,
            GlobeEvent::FlightCompleted {
                task,
                target: self.target,
            },
        );
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

impl<R: CameraRig> Animation<R> for FlyTo {
    fn step(
        &mut self,
        task: TaskId,
        frame: Frame,
        rig: &mut R,
        bus: &mut EventBus,
    ) -> AnimationStatus {
        let start_look_at = *self.start_look_at.get_or_insert_with(|| rig.look_at());

        loop {
            if self.phase == FlyPhase::Done {
                return AnimationStatus::Done;
            }

            let segment = match self.segment {
                Some(segment) => segment,
                None => {
                    let segment = self.begin_phase(&*rig, frame.time);
                    debug!(
                        %task,
                        phase = self.phase.name(),
                        duration_ms = segment.duration_ms,
                        "flight phase started"
                    );
                    bus.emit(
                        frame,
                        GlobeEvent::PhaseEntered {
                            task,
                            phase: self.phase.name(),
                        },
                    );
                    self.segment = Some(segment);
                    segment
                }
            };

            let t = segment.progress(frame.time);
            self.apply(rig, &segment, t, start_look_at);
            if t < 1.0 {
                return AnimationStatus::Continue;
            }

            self.phase = self.phase.next();
            self.segment = None;
            if self.phase == FlyPhase::Done {
                self.finish(task, frame, bus);
                return AnimationStatus::Done;
            }
        }
    }

    fn cancelled(&mut self, task: TaskId, frame: Frame, bus: &mut EventBus) {
        debug!(%task, phase = self.phase.name(), "flight cancelled");
        bus.emit(
            frame,
            GlobeEvent::FlightSuperseded {
                task,
                target: self.target,
            },
        );
    }
}
