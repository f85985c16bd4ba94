#![forbid(unsafe_code)]

//! Terminal session and frame loop.
//!
//! Owns the raw-mode/alternate-screen lifecycle and the clock: wall-clock
//! frame deltas convert to logical units (one unit per 60 Hz frame) before
//! they reach the engine. The terminal is restored on every exit path,
//! including panics, via the drop guard.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use schedtui_sim::{SimConfig, Simulation};
use tracing::info;

use crate::cli::SizePreset;
use crate::paint::Painter;

/// Target frame interval.
const FRAME: Duration = Duration::from_millis(16);
/// Logical delta units per wall-clock second at speed 1.
const UNITS_PER_SECOND: f32 = 60.0;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the visualization until the user quits.
pub fn run(cfg: SimConfig, size: SizePreset) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut sim = Simulation::new(cfg);
    let mut painter = Painter::new(size);
    let mut paused = false;
    let mut last = Instant::now();

    info!("session started");
    loop {
        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break;
                        }
                        KeyCode::Char(' ') => paused = !paused,
                        _ => {}
                    }
                }
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32() * UNITS_PER_SECOND;
        last = now;
        if !paused {
            sim.tick(delta);
        }

        painter.clear();
        sim.render(&mut painter);
        painter.status(if paused {
            "paused · space resume · q quit"
        } else {
            "space pause · q quit"
        });
        painter.present(&mut stdout)?;
        stdout.flush()?;
    }
    info!("session ended");
    Ok(())
}
