#![forbid(unsafe_code)]

//! Task lifecycle state machine.
//!
//! A [`Task`] cycles through `Idle`, `Running`, and `Blocked`, driven by a
//! lifecycle tween. Two more tweens ride along on independent axes: an
//! optional deadline countdown (active only while the task waits in the
//! idle queue) and a reposition move. Logical state progress and visual
//! interpolation never share a timer, so a task can animate toward a slot
//! while its blocked arc is already depleting.
//!
//! # Invariants
//!
//! 1. [`set_state`](Task::set_state) never restarts an in-flight lifecycle
//!    tween; only the state changes, and completion is interpreted per the
//!    state current at completion time.
//! 2. Completion of the lifecycle tween queues exactly one event; a tween
//!    that completes while the task is `Idle` queues nothing.
//! 3. While the task is not `Idle`, the remaining deadline reads as
//!    infinite, so it is never the most urgent pick.
//! 4. Retargeting an in-flight move restarts from the current interpolated
//!    position, never teleporting; a move to the current target is a no-op.

use crate::config::SimConfig;
use crate::grid::GridPoint;
use crate::rng::SeededRng;
use crate::sim::SimEvent;
use crate::tween::{Tween, inverse};

// ---------------------------------------------------------------------------
// Identity and state
// ---------------------------------------------------------------------------

/// Arena handle for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

impl TaskId {
    /// Arena slot index.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting in the idle queue for a run slot.
    Idle,
    /// Waiting out a blocked period.
    Blocked,
    /// Occupying a CPU slot.
    Running,
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Move {
    from: GridPoint,
    to: GridPoint,
    tween: Tween,
}

/// A single schedulable unit.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    state: TaskState,
    pos: GridPoint,
    run_duration: f32,
    block_duration: f32,
    deadline_duration: f32,
    move_duration: f32,
    time_scale: f32,
    lifecycle: Option<Tween>,
    deadline: Option<Tween>,
    movement: Option<Move>,
    /// Set while an inter-container transfer is animating; cleared when the
    /// arrival is consumed. Reflow moves within a container never set it.
    arriving: bool,
}

impl Task {
    fn new(id: TaskId, cfg: &SimConfig, pos: GridPoint) -> Self {
        Self {
            id,
            state: TaskState::Idle,
            pos,
            run_duration: cfg.run_duration,
            block_duration: cfg.block_duration,
            deadline_duration: cfg.deadline_duration,
            move_duration: cfg.move_duration,
            time_scale: cfg.time_scale,
            lifecycle: None,
            deadline: None,
            movement: None,
            arriving: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Current (possibly mid-move) grid position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> GridPoint {
        self.pos
    }

    /// Fill level of the state arc in [0, 1].
    ///
    /// Running sweeps 0 → 1, Blocked depletes 1 → 0, Idle rests at 0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match &self.lifecycle {
            Some(tween) => tween.value(),
            None => match self.state {
                TaskState::Running => 1.0,
                TaskState::Idle | TaskState::Blocked => 0.0,
            },
        }
    }

    /// Enter `next`, starting the state's lifecycle tween.
    ///
    /// If a lifecycle tween is still in flight the tween is left untouched
    /// and only the state changes; redundant transitions therefore never
    /// stack timers. The blocked duration is jittered per entry by
    /// `uniform(0.5, 1.5)` drawn from `rng`.
    pub fn set_state(&mut self, next: TaskState, rng: &mut SeededRng) {
        let in_flight = self.lifecycle.as_ref().is_some_and(|t| !t.is_complete());
        self.state = next;
        if in_flight {
            return;
        }
        self.lifecycle = match next {
            TaskState::Idle => None,
            TaskState::Running => Some(Tween::new(self.run_duration).scaled(self.time_scale)),
            TaskState::Blocked => {
                let duration = self.block_duration * rng.range(0.5, 1.5);
                Some(Tween::new(duration).shape(inverse).scaled(self.time_scale))
            }
        };
    }

    // -- deadline -----------------------------------------------------------

    /// Start the deadline countdown. No-op when deadlines are disabled or a
    /// countdown is already running (slot reshuffles must not reset it).
    pub fn start_deadline(&mut self) {
        if self.deadline_duration <= 0.0 || self.deadline.is_some() {
            return;
        }
        self.deadline = Some(Tween::new(self.deadline_duration).scaled(self.time_scale));
    }

    /// Drop the deadline countdown (the task left the idle queue).
    pub fn stop_deadline(&mut self) {
        self.deadline = None;
    }

    /// Delta units until the deadline expires, or infinity while the task is
    /// not idle-tracked. Expiry is a ranking signal, never a timeout: the
    /// value bottoms out at 0.
    #[must_use]
    pub fn deadline_remaining(&self) -> f32 {
        match (&self.deadline, self.state) {
            (Some(tween), TaskState::Idle) => tween.remaining(),
            _ => f32::INFINITY,
        }
    }

    /// Remaining deadline as a fraction of the full countdown, for display.
    #[must_use]
    pub fn deadline_fraction(&self) -> Option<f32> {
        match (&self.deadline, self.state) {
            (Some(tween), TaskState::Idle) => {
                let full = self.deadline_duration * self.time_scale;
                Some((tween.remaining() / full).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }

    // -- movement -----------------------------------------------------------

    /// Place the task instantly, cancelling any in-flight move.
    pub fn set_position(&mut self, pos: GridPoint) {
        self.pos = pos;
        self.movement = None;
        self.arriving = false;
    }

    /// Start or redirect an animated move toward `target`.
    ///
    /// A redirect restarts from the current interpolated position. Returns
    /// whether a move is now in flight; `false` means the task already sits
    /// at `target`.
    pub fn animate_move_to(&mut self, target: GridPoint) -> bool {
        if let Some(mv) = &self.movement {
            if mv.to.approx_eq(target) {
                return true;
            }
        } else if self.pos.approx_eq(target) {
            return false;
        }
        self.movement = Some(Move {
            from: self.pos,
            to: target,
            tween: Tween::new(self.move_duration)
                .shape(crate::tween::ease_out)
                .scaled(self.time_scale),
        });
        true
    }

    /// Mark the in-flight move as an inter-container arrival.
    pub fn begin_arrival(&mut self) {
        self.arriving = true;
    }

    /// Consume the arrival mark, reporting whether one was pending.
    pub fn take_arrival(&mut self) -> bool {
        std::mem::take(&mut self.arriving)
    }

    #[inline]
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }

    // -- per-frame update ---------------------------------------------------

    /// Advance all owned tweens, queueing completion events.
    pub fn tick(&mut self, delta: f32, events: &mut Vec<SimEvent>) {
        if let Some(tween) = &mut self.lifecycle {
            tween.tick(delta);
            if tween.is_complete() {
                self.lifecycle = None;
                match self.state {
                    TaskState::Running => events.push(SimEvent::RunFinished(self.id)),
                    TaskState::Blocked => events.push(SimEvent::BlockFinished(self.id)),
                    TaskState::Idle => {}
                }
            }
        }
        if let Some(tween) = &mut self.deadline {
            // Expiry latches at 0 remaining; it only affects queue ranking.
            tween.tick(delta);
        }
        if let Some(mv) = &mut self.movement {
            mv.tween.tick(delta);
            self.pos = mv.from.lerp(mv.to, mv.tween.value());
            if mv.tween.is_complete() {
                self.pos = mv.to;
                self.movement = None;
                events.push(SimEvent::MoveArrived(self.id));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Owning arena for all tasks in a simulation.
///
/// Containers hold [`TaskId`]s and borrow the arena to touch members, which
/// keeps a task owned by exactly one place while any container can reorder
/// its ids freely.
#[derive(Debug, Default)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a task at `pos` and return its handle.
    pub fn spawn(&mut self, cfg: &SimConfig, pos: GridPoint) -> TaskId {
        let id = TaskId(self.tasks.len());
        self.tasks.push(Task::new(id, cfg, pos));
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, id: TaskId) -> &mut Task {
        &mut self.tasks[id.0]
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
