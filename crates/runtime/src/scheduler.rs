use crate::animation::{Animation, AnimationStatus, TaskId};
use crate::event_bus::EventBus;
use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameSummary {
    pub stepped: usize,
    /// Tasks that reported `Done` this frame, in spawn order.
    pub finished: Vec<TaskId>,
}

/// Cooperative single-threaded driver for [`Animation`]s.
///
/// Every live task is stepped exactly once per [`Scheduler::run_frame`], in
/// spawn order; finished tasks are dropped at the end of the frame.
pub struct Scheduler<Ctx> {
    next_id: u64,
    tasks: Vec<(TaskId, Box<dyn Animation<Ctx>>)>,
}

impl<Ctx> Default for Scheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Scheduler<Ctx> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    pub fn spawn(&mut self, animation: impl Animation<Ctx> + 'static) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tasks.push((id, Box::new(animation)));
        id
    }

    /// Removes `task` without stepping it again.
    ///
    /// Returns `true` if the task was still live.
    pub fn cancel(&mut self, task: TaskId, frame: Frame, bus: &mut EventBus) -> bool {
        let Some(pos) = self.tasks.iter().position(|(id, _)| *id == task) else {
            return false;
        };
        let (id, mut animation) = self.tasks.remove(pos);
        animation.cancelled(id, frame, bus);
        true
    }

    pub fn is_active(&self, task: TaskId) -> bool {
        self.tasks.iter().any(|(id, _)| *id == task)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn run_frame(&mut self, frame: Frame, ctx: &mut Ctx, bus: &mut EventBus) -> FrameSummary {
        let mut summary = FrameSummary::default();
        for (id, animation) in &mut self.tasks {
            summary.stepped += 1;
            if animation.step(*id, frame, ctx, bus) == AnimationStatus::Done {
                summary.finished.push(*id);
            }
        }
        if !summary.finished.is_empty() {
            self.tasks.retain(|(id, _)| !summary.finished.contains(id));
        }
        summary
    }
}
