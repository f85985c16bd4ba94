#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `SCHEDTUI_*` prefix;
//! explicit flags win over the environment.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
SchedTUI — an animated CPU-scheduler visualization

USAGE:
    schedtui [OPTIONS]

OPTIONS:
    --tasks=N        Number of tasks (default: 6)
    --cpus=N         Number of CPU run slots (default: 1)
    --quota=N        Preempt a running task after N time units (0 = off)
    --deadline       Track idle deadlines and select the most urgent task
    --speed=F        Playback speed multiplier, higher is faster (default: 1.0)
    --size=PRESET    Render scale: 'small', 'medium' (default) or 'large'
    --seed=N         Seed for the blocked-duration jitter
    --help, -h       Show this help message
    --version, -V    Show version

KEYBINDINGS:
    space           Pause / resume
    q / Esc / Ctrl+C  Quit

ENVIRONMENT VARIABLES:
    SCHEDTUI_TASKS     Override --tasks
    SCHEDTUI_CPUS      Override --cpus
    SCHEDTUI_QUOTA     Override --quota
    SCHEDTUI_DEADLINE  Override --deadline (1/true)
    SCHEDTUI_SPEED     Override --speed
    SCHEDTUI_SIZE      Override --size
    SCHEDTUI_SEED      Override --seed
    SCHEDTUI_LOG       Tracing filter; logs go to schedtui.log";

/// Render scale preset. Affects only the painter's cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
}

impl SizePreset {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    pub tasks: usize,
    pub cpus: usize,
    pub quota: f32,
    pub deadline: bool,
    pub speed: f32,
    pub size: SizePreset,
    pub seed: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            tasks: 6,
            cpus: 1,
            quota: 0.0,
            deadline: false,
            speed: 1.0,
            size: SizePreset::Medium,
            seed: 0x5EED,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        // Environment defaults first; flags override below.
        if let Ok(val) = env::var("SCHEDTUI_TASKS")
            && let Ok(n) = val.parse()
        {
            opts.tasks = n;
        }
        if let Ok(val) = env::var("SCHEDTUI_CPUS")
            && let Ok(n) = val.parse()
        {
            opts.cpus = n;
        }
        if let Ok(val) = env::var("SCHEDTUI_QUOTA")
            && let Ok(n) = val.parse()
        {
            opts.quota = n;
        }
        if let Ok(val) = env::var("SCHEDTUI_DEADLINE") {
            opts.deadline = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Ok(val) = env::var("SCHEDTUI_SPEED")
            && let Ok(n) = val.parse()
        {
            opts.speed = n;
        }
        if let Ok(val) = env::var("SCHEDTUI_SIZE")
            && let Some(preset) = SizePreset::parse(&val)
        {
            opts.size = preset;
        }
        if let Ok(val) = env::var("SCHEDTUI_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = n;
        }

        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("schedtui {VERSION}");
                    process::exit(0);
                }
                "--deadline" => opts.deadline = true,
                _ => {
                    let Some((flag, value)) = arg.split_once('=') else {
                        usage_error(&arg);
                    };
                    match flag {
                        "--tasks" => opts.tasks = parse_or_exit(&arg, value),
                        "--cpus" => opts.cpus = parse_or_exit(&arg, value),
                        "--quota" => opts.quota = parse_or_exit(&arg, value),
                        "--speed" => opts.speed = parse_or_exit(&arg, value),
                        "--seed" => opts.seed = parse_or_exit(&arg, value),
                        "--size" => {
                            let Some(preset) = SizePreset::parse(value) else {
                                usage_error(&arg);
                            };
                            opts.size = preset;
                        }
                        _ => usage_error(&arg),
                    }
                }
            }
        }

        opts
    }
}

fn parse_or_exit<T: std::str::FromStr>(arg: &str, value: &str) -> T {
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => usage_error(arg),
    }
}

fn usage_error(arg: &str) -> ! {
    eprintln!("schedtui: unrecognized or malformed argument: {arg}");
    eprintln!("Try 'schedtui --help'.");
    process::exit(2);
}
