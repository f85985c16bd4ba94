#![forbid(unsafe_code)]

//! SchedTUI simulation engine.
//!
//! A frame-driven, didactic model of a CPU task scheduler: a closed set of
//! tasks cycles between an idle queue, one or more CPU run slots, and a
//! blocked queue, driven entirely by normalized progress tweens. The engine
//! does no drawing and keeps no wall-clock time; a front end feeds it
//! logical per-frame deltas via [`Simulation::tick`] and reads the scene
//! back through the [`Renderer`] trait.
//!
//! # Components
//!
//! - [`Tween`] — normalized 0–1 progress timer with shaping functions and
//!   an optional reverse phase
//! - [`Task`] — the Idle/Blocked/Running state machine
//! - [`Queue`] — ordered container with FIFO or deadline-aware selection
//! - [`Cpu`] — capacity-1 run slot with optional quota preemption
//! - [`Simulation`] — wiring, tick order, and the scheduling policy

pub mod config;
pub mod cpu;
pub mod grid;
pub mod queue;
pub mod rng;
pub mod sim;
pub mod task;
pub mod tween;
pub mod view;

pub use config::SimConfig;
pub use cpu::Cpu;
pub use grid::GridPoint;
pub use queue::{Queue, SelectMode};
pub use rng::SeededRng;
pub use sim::{SimEvent, Simulation};
pub use task::{Task, TaskId, TaskSet, TaskState};
pub use tween::Tween;
pub use view::{ContainerKind, ContainerView, Renderer, TaskView};
