//! Cancelable delayed tasks on an explicit clock.
//!
//! The host drives time with [`Scheduler::advance`] from its event loop (a
//! frame tick, a timer callback, or a test). Fired tasks hand their payload
//! back to the caller, which handles it against live state.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due: Duration,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self { Self { now: Duration::ZERO, next_id: 0, tasks: Vec::new() } }

    pub fn schedule(&mut self, delay: Duration, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled { id, due: self.now + delay, payload });
        log::trace!("scheduled task {:?} at {:?}", id, self.now + delay);
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        log::trace!("cancelled task {:?}", id);
        Some(self.tasks.remove(idx).payload)
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    pub fn get(&self, id: TaskId) -> Option<&T> { self.tasks.iter().find(|t| t.id == id).map(|t| &t.payload) }
    pub fn is_pending(&self, id: TaskId) -> bool { self.tasks.iter().any(|t| t.id == id) }
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    /// Moves the clock forward and returns every task that came due, earliest
    /// first; ties keep scheduling order.
    pub fn advance(&mut self, dt: Duration) -> Vec<(TaskId, T)> {
        self.now += dt;
        let now = self.now;
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].due <= now { due.push(self.tasks.remove(i)); } else { i += 1; }
        }
        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| (t.id, t.payload)).collect()
    }
}
