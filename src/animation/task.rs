//! Cancellable per-frame tasks.
//!
//! Starting an animation hands back a [`TaskHandle`]. The owner keeps the handle and calls
//! [`TaskHandle::cancel`] to stop it; the scheduler drops cancelled tasks before the next frame
//! runs them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug)]
pub struct TaskHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaskHandle {}

/// A task together with the handle that controls it.
#[derive(Debug)]
pub struct Scheduled<T> {
    pub handle: TaskHandle,
    pub task: T,
}

/// Queue of tasks stepped once per display frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, task: T) -> TaskHandle {
        let handle = TaskHandle {
            id: self.next_id,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.next_id += 1;
        self.tasks.push(Scheduled {
            handle: handle.clone(),
            task,
        });
        handle
    }

    /// Live (uncancelled) task count.
    pub fn len(&self) -> usize {
        self.tasks
            .iter()
            .filter(|s| !s.handle.is_cancelled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_running(&self, handle: &TaskHandle) -> bool {
        !handle.is_cancelled() && self.tasks.iter().any(|s| s.handle == *handle)
    }

    /// Remove every live task for stepping. Cancelled ones are discarded.
    ///
    /// Tasks that should run again next frame go back through [`FrameScheduler::requeue`].
    pub fn take_live(&mut self) -> Vec<Scheduled<T>> {
        let mut tasks = std::mem::take(&mut self.tasks);
        tasks.retain(|s| !s.handle.is_cancelled());
        tasks
    }

    pub fn requeue(&mut self, scheduled: Scheduled<T>) {
        if !scheduled.handle.is_cancelled() {
            self.tasks.push(scheduled);
        }
    }

    pub fn cancel_all(&mut self) {
        for s in self.tasks.drain(..) {
            s.handle.cancel();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/task.rs"]
mod tests;
