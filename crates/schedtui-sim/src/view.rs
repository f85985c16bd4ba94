#![forbid(unsafe_code)]

//! Render interface.
//!
//! The engine never draws; it hands read-only view structs to a
//! [`Renderer`] after each frame's update. Containers come first, then
//! tasks, so task circles paint over container fills.

use crate::grid::GridPoint;
use crate::task::{TaskId, TaskState};

/// Which kind of container a view describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The idle queue.
    Idle,
    /// A CPU run slot.
    Cpu,
    /// The blocked queue.
    Blocked,
}

/// Snapshot of one container for drawing.
#[derive(Debug, Clone, Copy)]
pub struct ContainerView {
    pub kind: ContainerKind,
    /// Index among containers of the same kind (CPU number).
    pub index: usize,
    /// Top-left corner on the grid.
    pub origin: GridPoint,
    /// Height in slot rows.
    pub rows: usize,
    /// Arrival highlight intensity in [0, 1].
    pub highlight: f32,
    /// Elapsed fraction of the run quota, when armed.
    pub quota: Option<f32>,
}

/// Snapshot of one task for drawing.
#[derive(Debug, Clone, Copy)]
pub struct TaskView {
    pub id: TaskId,
    pub state: TaskState,
    /// Circle center on the grid.
    pub center: GridPoint,
    /// Fill level of the state arc in [0, 1].
    pub progress: f32,
    /// Remaining deadline fraction, while idle-tracked.
    pub deadline: Option<f32>,
}

/// Drawing sink the simulation reports into.
pub trait Renderer {
    /// Draw one container.
    fn container(&mut self, view: &ContainerView);

    /// Draw one task.
    fn task(&mut self, view: &TaskView);
}
