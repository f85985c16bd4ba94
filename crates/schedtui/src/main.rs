#![forbid(unsafe_code)]

//! SchedTUI binary entry point.

mod app;
mod cli;
mod paint;
mod theme;

use std::env;
use std::fs::File;
use std::process;
use std::sync::Mutex;

use schedtui_sim::SimConfig;
use tracing_subscriber::EnvFilter;

/// Deadline countdown used when `--deadline` is set, in logical units.
const DEADLINE_UNITS: f32 = 600.0;

fn main() {
    let opts = cli::Opts::parse();
    init_logging();

    let cfg = SimConfig {
        task_count: opts.tasks,
        cpu_count: opts.cpus,
        run_quota: opts.quota,
        deadline_duration: if opts.deadline { DEADLINE_UNITS } else { 0.0 },
        // The engine scales durations; a higher playback speed means a
        // smaller duration multiplier.
        time_scale: 1.0 / opts.speed.max(0.05),
        seed: opts.seed,
        ..SimConfig::default()
    };

    if let Err(e) = app::run(cfg, opts.size) {
        eprintln!("schedtui: {e}");
        process::exit(1);
    }
}

/// Route tracing to a file when `SCHEDTUI_LOG` is set; stdout belongs to
/// the UI.
fn init_logging() {
    let Ok(filter) = env::var("SCHEDTUI_LOG") else {
        return;
    };
    match File::create("schedtui.log") {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => eprintln!("schedtui: cannot open log file: {e}"),
    }
}
