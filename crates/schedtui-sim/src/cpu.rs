#![forbid(unsafe_code)]

//! CPU run slots.
//!
//! A [`Cpu`] wraps a capacity-1 [`Queue`] (the running slot) and an optional
//! quota tween. The quota is armed exactly while a task occupies the slot:
//! placing a task always (re)starts it, vacating the slot stops it. Expiry
//! queues [`SimEvent::QuotaExpired`] once per arming; the scheduler decides
//! whether anyone is waiting to swap in.

use crate::grid::GridPoint;
use crate::queue::{Queue, SelectMode};
use crate::rng::SeededRng;
use crate::sim::SimEvent;
use crate::task::{TaskId, TaskSet, TaskState};
use crate::tween::Tween;

/// A single-capacity execution slot.
#[derive(Debug)]
pub struct Cpu {
    slot: Queue,
    quota_duration: f32,
    time_scale: f32,
    quota: Option<Tween>,
}

impl Cpu {
    /// Create a run slot at `origin`. A `quota_duration` of 0 disables
    /// preemption.
    #[must_use]
    pub fn new(origin: GridPoint, quota_duration: f32, time_scale: f32) -> Self {
        Self {
            slot: Queue::new(origin, 1, SelectMode::Fifo, time_scale),
            quota_duration,
            time_scale,
            quota: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn occupant(&self) -> Option<TaskId> {
        self.slot.peek()
    }

    #[inline]
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.slot.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn origin(&self) -> GridPoint {
        self.slot.origin()
    }

    /// Place `id` instantly, transition it to Running, and arm the quota.
    pub fn push(&mut self, id: TaskId, tasks: &mut TaskSet, rng: &mut SeededRng) {
        self.slot.push(id, tasks);
        tasks.get_mut(id).set_state(TaskState::Running, rng);
        self.arm_quota();
    }

    /// As [`push`](Self::push), but the task glides into the slot. The
    /// logical transition to Running happens immediately; only the visual
    /// move is deferred.
    pub fn push_animated(&mut self, id: TaskId, tasks: &mut TaskSet, rng: &mut SeededRng) {
        self.slot.push_animated(id, tasks);
        tasks.get_mut(id).set_state(TaskState::Running, rng);
        self.arm_quota();
    }

    /// Vacate the slot, stopping the quota.
    pub fn pop(&mut self, tasks: &mut TaskSet) -> Option<TaskId> {
        let id = self.slot.pop(tasks);
        if self.slot.is_empty() {
            self.quota = None;
        }
        id
    }

    /// Remove `id` if it occupies the slot, stopping the quota.
    pub fn remove(&mut self, id: TaskId, tasks: &mut TaskSet) -> bool {
        let removed = self.slot.remove(id, tasks);
        if self.slot.is_empty() {
            self.quota = None;
        }
        removed
    }

    /// Ensure something is running: start a waiting occupant, or pull the
    /// next task out of `idle` and animate it in.
    pub fn run(&mut self, idle: &mut Queue, tasks: &mut TaskSet, rng: &mut SeededRng) {
        if let Some(id) = self.occupant() {
            if tasks.get(id).state() != TaskState::Running {
                tasks.get_mut(id).set_state(TaskState::Running, rng);
                self.arm_quota();
            }
            return;
        }
        if let Some(id) = idle.pop(tasks) {
            self.push_animated(id, tasks, rng);
        }
    }

    /// (Re)start the quota tween, if preemption is configured.
    pub fn arm_quota(&mut self) {
        if self.quota_duration > 0.0 {
            self.quota = Some(Tween::new(self.quota_duration).scaled(self.time_scale));
        }
    }

    /// Elapsed fraction of the current quota, for display.
    #[must_use]
    pub fn quota_progress(&self) -> Option<f32> {
        self.quota.as_ref().map(Tween::raw)
    }

    /// Advance the slot highlight and the quota; expiry queues an event.
    pub fn tick(&mut self, delta: f32, index: usize, events: &mut Vec<SimEvent>) {
        self.slot.tick(delta);
        if let Some(tween) = &mut self.quota {
            tween.tick(delta);
            if tween.is_complete() {
                // Disarm until the scheduler re-arms or swaps; a completed
                // tween must not fire on every later tick.
                self.quota = None;
                events.push(SimEvent::QuotaExpired(index));
            }
        }
    }

    /// Start the slot's arrival highlight.
    pub fn flash(&mut self) {
        self.slot.flash();
    }

    /// Current slot highlight intensity in [0, 1].
    #[must_use]
    pub fn highlight_level(&self) -> f32 {
        self.slot.highlight_level()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn fixture(quota: f32) -> (Cpu, Queue, TaskSet, Vec<TaskId>, SeededRng) {
        let cfg = SimConfig {
            run_duration: 100.0,
            move_duration: 10.0,
            ..SimConfig::default()
        };
        let mut tasks = TaskSet::new();
        let ids: Vec<TaskId> = (0..2)
            .map(|_| tasks.spawn(&cfg, GridPoint::new(0.5, 0.5)))
            .collect();
        let mut idle = Queue::new(GridPoint::new(0.0, 0.0), 5, SelectMode::Fifo, 1.0);
        for &id in &ids {
            idle.push(id, &mut tasks);
        }
        let cpu = Cpu::new(GridPoint::new(2.0, 2.0), quota, 1.0);
        (cpu, idle, tasks, ids, SeededRng::new(3))
    }

    #[test]
    fn push_starts_running_and_arms_quota() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(10.0);
        idle.remove(ids[0], &mut tasks);
        cpu.push(ids[0], &mut tasks, &mut rng);
        assert_eq!(cpu.occupant(), Some(ids[0]));
        assert_eq!(tasks.get(ids[0]).state(), TaskState::Running);
        assert!(cpu.quota_progress().is_some());
    }

    #[test]
    fn quota_stays_disarmed_when_disabled() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(0.0);
        idle.remove(ids[0], &mut tasks);
        cpu.push(ids[0], &mut tasks, &mut rng);
        assert!(cpu.quota_progress().is_none());
    }

    #[test]
    fn vacating_stops_quota() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(10.0);
        idle.remove(ids[0], &mut tasks);
        cpu.push(ids[0], &mut tasks, &mut rng);
        assert_eq!(cpu.pop(&mut tasks), Some(ids[0]));
        assert!(cpu.quota_progress().is_none());
        assert!(cpu.is_free());
    }

    #[test]
    fn run_pulls_from_idle_queue() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(10.0);
        cpu.run(&mut idle, &mut tasks, &mut rng);
        assert_eq!(cpu.occupant(), Some(ids[0]));
        assert_eq!(idle.len(), 1);
        assert_eq!(tasks.get(ids[0]).state(), TaskState::Running);
    }

    #[test]
    fn run_starts_waiting_occupant_without_pulling() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(10.0);
        idle.remove(ids[0], &mut tasks);
        // Seat the task without starting it.
        cpu.slot.push(ids[0], &mut tasks);
        assert_eq!(tasks.get(ids[0]).state(), TaskState::Idle);
        cpu.run(&mut idle, &mut tasks, &mut rng);
        assert_eq!(tasks.get(ids[0]).state(), TaskState::Running);
        assert!(cpu.quota_progress().is_some());
        assert_eq!(idle.len(), 1, "occupied slot must not pull");
    }

    #[test]
    fn quota_expiry_fires_once_per_arming() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(10.0);
        idle.remove(ids[0], &mut tasks);
        cpu.push(ids[0], &mut tasks, &mut rng);
        let mut events = Vec::new();
        cpu.tick(10.0, 0, &mut events);
        assert_eq!(events, vec![SimEvent::QuotaExpired(0)]);
        events.clear();
        cpu.tick(10.0, 0, &mut events);
        assert!(events.is_empty(), "expiry latches until re-armed");
        cpu.arm_quota();
        cpu.tick(10.0, 0, &mut events);
        assert_eq!(events, vec![SimEvent::QuotaExpired(0)]);
    }

    #[test]
    fn restart_on_new_occupant() {
        let (mut cpu, mut idle, mut tasks, ids, mut rng) = fixture(10.0);
        idle.remove(ids[0], &mut tasks);
        cpu.push(ids[0], &mut tasks, &mut rng);
        let mut events = Vec::new();
        cpu.tick(6.0, 0, &mut events);
        cpu.pop(&mut tasks);
        idle.remove(ids[1], &mut tasks);
        cpu.push(ids[1], &mut tasks, &mut rng);
        cpu.tick(6.0, 0, &mut events);
        assert!(events.is_empty(), "fresh quota for the new occupant");
    }
}
