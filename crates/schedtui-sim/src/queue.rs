#![forbid(unsafe_code)]

//! Ordered task containers.
//!
//! A [`Queue`] holds [`TaskId`]s over the shared [`TaskSet`] arena and lays
//! its members out as stacked slots below its grid origin. Selection is
//! FIFO by default; a deadline-aware queue pops the member whose remaining
//! deadline is smallest, ties going to the lowest slot.
//!
//! Every membership change reflows the survivors: slot targets are
//! recomputed and members whose slot moved get an animated reposition.
//! Containers also own the transient arrival highlight, a square-shaped
//! tween that rises over 10 delta units and falls back over 10 more.

use crate::grid::GridPoint;
use crate::task::{TaskId, TaskSet};
use crate::tween::{Tween, square};

/// Highlight rise time in delta units.
const HIGHLIGHT_RISE: f32 = 10.0;
/// Highlight fall time in delta units.
const HIGHLIGHT_FALL: f32 = 10.0;

/// How `pop` chooses among members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Remove the head (first pushed).
    Fifo,
    /// Remove the member with the smallest remaining deadline.
    Deadline,
}

/// An ordered holding area for tasks.
#[derive(Debug)]
pub struct Queue {
    members: Vec<TaskId>,
    origin: GridPoint,
    rows: usize,
    select: SelectMode,
    track_deadlines: bool,
    time_scale: f32,
    highlight: Option<Tween>,
}

impl Queue {
    /// Create a queue at `origin` rendered `rows` slots tall.
    #[must_use]
    pub fn new(origin: GridPoint, rows: usize, select: SelectMode, time_scale: f32) -> Self {
        Self {
            members: Vec::new(),
            origin,
            rows,
            select,
            track_deadlines: false,
            time_scale,
            highlight: None,
        }
    }

    /// Start members' deadline countdowns while they sit here.
    #[must_use]
    pub fn with_deadline_tracking(mut self) -> Self {
        self.track_deadlines = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.members.contains(&id)
    }

    #[inline]
    #[must_use]
    pub fn origin(&self) -> GridPoint {
        self.origin
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn tracks_deadlines(&self) -> bool {
        self.track_deadlines
    }

    /// Center of the stacked slot at `index`.
    #[must_use]
    pub fn slot_center(&self, index: usize) -> GridPoint {
        GridPoint::new(self.origin.x + 0.5, self.origin.y + index as f32 + 0.5)
    }

    /// Head of the queue in FIFO order, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<TaskId> {
        self.members.first().copied()
    }

    /// Append `id`, placing it instantly in the next slot. Starts the
    /// deadline countdown immediately when this queue tracks deadlines.
    pub fn push(&mut self, id: TaskId, tasks: &mut TaskSet) {
        self.members.push(id);
        let slot = self.slot_center(self.members.len() - 1);
        let task = tasks.get_mut(id);
        task.set_position(slot);
        if self.track_deadlines {
            task.start_deadline();
        }
    }

    /// Append `id` with an animated move into its slot.
    ///
    /// The deadline start and the container highlight are deferred to the
    /// arrival; if the task already sits on the slot this degenerates to an
    /// instant [`push`](Self::push).
    pub fn push_animated(&mut self, id: TaskId, tasks: &mut TaskSet) {
        self.members.push(id);
        let slot = self.slot_center(self.members.len() - 1);
        let task = tasks.get_mut(id);
        if task.animate_move_to(slot) {
            task.begin_arrival();
        } else {
            if self.track_deadlines {
                task.start_deadline();
            }
            self.flash();
        }
    }

    /// Remove `id` by identity. Returns `false` (and changes nothing) when
    /// the task is not a member. Survivors are reflowed.
    pub fn remove(&mut self, id: TaskId, tasks: &mut TaskSet) -> bool {
        let Some(index) = self.members.iter().position(|&m| m == id) else {
            return false;
        };
        self.members.remove(index);
        tasks.get_mut(id).stop_deadline();
        self.reflow(tasks);
        true
    }

    /// Remove and return the selected member, or `None` when empty.
    ///
    /// FIFO mode takes the head; deadline mode scans for the smallest
    /// remaining deadline, first-found winning ties. The departing task's
    /// deadline countdown stops.
    pub fn pop(&mut self, tasks: &mut TaskSet) -> Option<TaskId> {
        if self.members.is_empty() {
            return None;
        }
        let index = match self.select {
            SelectMode::Fifo => 0,
            SelectMode::Deadline => {
                let mut best = 0;
                let mut best_remaining = f32::INFINITY;
                for (i, &m) in self.members.iter().enumerate() {
                    let remaining = tasks.get(m).deadline_remaining();
                    if remaining < best_remaining {
                        best = i;
                        best_remaining = remaining;
                    }
                }
                best
            }
        };
        let id = self.members.remove(index);
        tasks.get_mut(id).stop_deadline();
        self.reflow(tasks);
        Some(id)
    }

    /// Reassign slot targets after a membership change; members whose slot
    /// moved glide to the new position.
    fn reflow(&mut self, tasks: &mut TaskSet) {
        for (index, &id) in self.members.iter().enumerate() {
            let slot = self.slot_center(index);
            tasks.get_mut(id).animate_move_to(slot);
        }
    }

    // -- highlight ----------------------------------------------------------

    /// Start the transient arrival highlight.
    pub fn flash(&mut self) {
        self.highlight = Some(
            Tween::new(HIGHLIGHT_RISE)
                .with_reverse(HIGHLIGHT_FALL)
                .shape(square)
                .scaled(self.time_scale),
        );
    }

    /// Advance the highlight.
    pub fn tick(&mut self, delta: f32) {
        if let Some(tween) = &mut self.highlight {
            tween.tick(delta);
            if tween.is_complete() {
                self.highlight = None;
            }
        }
    }

    /// Current highlight intensity in [0, 1].
    #[must_use]
    pub fn highlight_level(&self) -> f32 {
        self.highlight.as_ref().map_or(0.0, Tween::value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
