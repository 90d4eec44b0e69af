use crate::event_bus::EventBus;
use crate::frame::Frame;

/// Identifies a task spawned on a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimationStatus {
    Continue,
    Done,
}

impl AnimationStatus {
    pub fn is_done(self) -> bool {
        self == AnimationStatus::Done
    }
}

/// A unit of per-frame work advanced by the [`Scheduler`](crate::Scheduler).
///
/// `step` is called once per frame until it returns
/// [`AnimationStatus::Done`]; it must never block. `Ctx` is whatever the
/// animation mutates, typically the camera rig.
pub trait Animation<Ctx> {
    fn step(
        &mut self,
        task: TaskId,
        frame: Frame,
        ctx: &mut Ctx,
        bus: &mut EventBus,
    ) -> AnimationStatus;

    /// Called instead of further steps when the task is cancelled.
    fn cancelled(&mut self, _task: TaskId, _frame: Frame, _bus: &mut EventBus) {}
}
