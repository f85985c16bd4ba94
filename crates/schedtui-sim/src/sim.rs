#![forbid(unsafe_code)]

//! The simulation: containers, tick loop, and scheduling policy.
//!
//! [`Simulation`] owns the task arena, the idle queue, the blocked queue,
//! and one run slot per CPU. Each frame, [`tick`](Simulation::tick) advances
//! every live component in a fixed order (idle queue, CPUs, blocked queue,
//! tasks), collecting completion events into a buffer, then drains the
//! buffer in arrival order. Handlers perform direct structural moves and
//! never queue further events, so a cascade always settles within the frame.
//!
//! The task set is closed: tasks are created once at startup and only ever
//! move between containers.

use tracing::debug;

use crate::config::SimConfig;
use crate::cpu::Cpu;
use crate::grid::GridPoint;
use crate::queue::{Queue, SelectMode};
use crate::rng::SeededRng;
use crate::task::{TaskId, TaskSet, TaskState};
use crate::view::{ContainerKind, ContainerView, Renderer, TaskView};

// ---------------------------------------------------------------------------
// Scene layout
// ---------------------------------------------------------------------------

/// Idle queue rectangle origin.
const IDLE_ORIGIN: GridPoint = GridPoint::new(0.0, 0.0);
/// Blocked queue rectangle origin.
const BLOCKED_ORIGIN: GridPoint = GridPoint::new(4.0, 0.0);
/// Both queues are five slots tall.
const QUEUE_ROWS: usize = 5;
/// CPU slots sit in the center column.
const CPU_COLUMN: f32 = 2.0;
/// Vertical pitch between stacked CPU slots.
const CPU_PITCH: f32 = 1.5;

/// Origin of CPU slot `index` out of `count`, centered on the middle row.
fn cpu_origin(index: usize, count: usize) -> GridPoint {
    let offset = index as f32 - (count.saturating_sub(1)) as f32 / 2.0;
    GridPoint::new(CPU_COLUMN, 2.0 + offset * CPU_PITCH)
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Completion events collected during a tick and drained by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// A task's running timer expired.
    RunFinished(TaskId),
    /// A task's blocked timer expired.
    BlockFinished(TaskId),
    /// A task's animated move reached its target.
    MoveArrived(TaskId),
    /// A CPU's time quota expired.
    QuotaExpired(usize),
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// The whole scheduling scene.
#[derive(Debug)]
pub struct Simulation {
    cfg: SimConfig,
    rng: SeededRng,
    tasks: TaskSet,
    idle: Queue,
    blocked: Queue,
    cpus: Vec<Cpu>,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Build the scene: all tasks spawn into the idle queue, then every CPU
    /// pulls its first task through the same path used at steady state.
    #[must_use]
    pub fn new(cfg: SimConfig) -> Self {
        let cfg = cfg.normalized();
        let mut rng = SeededRng::new(cfg.seed);
        let mut tasks = TaskSet::new();

        let select = if cfg.deadline_enabled() {
            SelectMode::Deadline
        } else {
            SelectMode::Fifo
        };
        let mut idle = Queue::new(IDLE_ORIGIN, QUEUE_ROWS, select, cfg.time_scale);
        if cfg.deadline_enabled() {
            idle = idle.with_deadline_tracking();
        }
        let blocked = Queue::new(BLOCKED_ORIGIN, QUEUE_ROWS, SelectMode::Fifo, cfg.time_scale);

        for i in 0..cfg.task_count {
            let pos = idle.slot_center(i);
            let id = tasks.spawn(&cfg, pos);
            idle.push(id, &mut tasks);
        }

        let mut cpus: Vec<Cpu> = (0..cfg.cpu_count)
            .map(|i| Cpu::new(cpu_origin(i, cfg.cpu_count), cfg.run_quota, cfg.time_scale))
            .collect();
        for cpu in &mut cpus {
            cpu.run(&mut idle, &mut tasks, &mut rng);
        }

        Self {
            cfg,
            rng,
            tasks,
            idle,
            blocked,
            cpus,
            events: Vec::new(),
        }
    }

    /// Advance the scene by `delta` logical units.
    pub fn tick(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        self.idle.tick(delta);
        for (i, cpu) in self.cpus.iter_mut().enumerate() {
            cpu.tick(delta, i, &mut self.events);
        }
        self.blocked.tick(delta);
        for task in self.tasks.iter_mut() {
            task.tick(delta, &mut self.events);
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        let events = std::mem::take(&mut self.events);
        for event in events {
            match event {
                SimEvent::RunFinished(id) => self.handle_run_finished(id),
                SimEvent::BlockFinished(id) => self.handle_block_finished(id),
                SimEvent::MoveArrived(id) => self.handle_move_arrived(id),
                SimEvent::QuotaExpired(cpu) => self.handle_quota_expired(cpu),
            }
        }
    }

    /// Run timer expired: the task blocks, and the freed CPU pulls the next
    /// idle task if anyone is waiting.
    fn handle_run_finished(&mut self, id: TaskId) {
        let Some(index) = self.cpus.iter().position(|c| c.occupant() == Some(id)) else {
            return;
        };
        debug!(task = id.index(), cpu = index, "run finished");
        self.cpus[index].remove(id, &mut self.tasks);
        self.tasks.get_mut(id).set_state(TaskState::Blocked, &mut self.rng);
        self.blocked.push_animated(id, &mut self.tasks);
        if !self.idle.is_empty() {
            self.cpus[index].run(&mut self.idle, &mut self.tasks, &mut self.rng);
        }
    }

    /// Blocked timer expired: go straight to a free CPU only when nobody is
    /// already waiting; otherwise join the idle queue.
    fn handle_block_finished(&mut self, id: TaskId) {
        debug!(task = id.index(), "block finished");
        self.blocked.remove(id, &mut self.tasks);
        let free = self.cpus.iter().position(Cpu::is_free);
        match free {
            Some(index) if self.idle.is_empty() => {
                self.cpus[index].push_animated(id, &mut self.tasks, &mut self.rng);
            }
            _ => {
                self.tasks.get_mut(id).set_state(TaskState::Idle, &mut self.rng);
                self.idle.push_animated(id, &mut self.tasks);
            }
        }
    }

    /// Quota expired: round-robin swap, unless nobody is waiting.
    fn handle_quota_expired(&mut self, index: usize) {
        if self.idle.is_empty() {
            // No one to swap in; let the occupant keep running and re-arm
            // so preemption can fire again a full quota later.
            self.cpus[index].arm_quota();
            return;
        }
        let Some(running) = self.cpus[index].occupant() else {
            return;
        };
        debug!(task = running.index(), cpu = index, "quota expired, preempting");
        self.cpus[index].remove(running, &mut self.tasks);
        self.tasks
            .get_mut(running)
            .set_state(TaskState::Idle, &mut self.rng);
        self.idle.push_animated(running, &mut self.tasks);
        self.cpus[index].run(&mut self.idle, &mut self.tasks, &mut self.rng);
    }

    /// A transfer move landed: flash the destination and, for the idle
    /// queue, start the deadline countdown that was deferred at push time.
    fn handle_move_arrived(&mut self, id: TaskId) {
        if !self.tasks.get_mut(id).take_arrival() {
            return;
        }
        if self.idle.contains(id) {
            self.idle.flash();
            if self.idle.tracks_deadlines() {
                self.tasks.get_mut(id).start_deadline();
            }
        } else if self.blocked.contains(id) {
            self.blocked.flash();
        } else if let Some(cpu) = self.cpus.iter_mut().find(|c| c.occupant() == Some(id)) {
            cpu.flash();
        }
    }

    // -- read access --------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    #[must_use]
    pub fn idle_queue(&self) -> &Queue {
        &self.idle
    }

    #[must_use]
    pub fn blocked_queue(&self) -> &Queue {
        &self.blocked
    }

    #[must_use]
    pub fn cpus(&self) -> &[Cpu] {
        &self.cpus
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    /// Report the scene to a renderer: containers first, then tasks.
    pub fn render<R: Renderer>(&self, renderer: &mut R) {
        renderer.container(&ContainerView {
            kind: ContainerKind::Idle,
            index: 0,
            origin: self.idle.origin(),
            rows: self.idle.rows(),
            highlight: self.idle.highlight_level(),
            quota: None,
        });
        for (index, cpu) in self.cpus.iter().enumerate() {
            renderer.container(&ContainerView {
                kind: ContainerKind::Cpu,
                index,
                origin: cpu.origin(),
                rows: 1,
                highlight: cpu.highlight_level(),
                quota: cpu.quota_progress(),
            });
        }
        renderer.container(&ContainerView {
            kind: ContainerKind::Blocked,
            index: 0,
            origin: self.blocked.origin(),
            rows: self.blocked.rows(),
            highlight: self.blocked.highlight_level(),
            quota: None,
        });
        for task in self.tasks.iter() {
            renderer.task(&TaskView {
                id: task.id(),
                state: task.state(),
                center: task.position(),
                progress: task.progress(),
                deadline: task.deadline_fraction(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
