#![forbid(unsafe_code)]

//! Palette and highlight blending.

use crossterm::style::Color;
use schedtui_sim::{ContainerKind, TaskState};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
        }
    }
}

/// Idle queue border.
pub const IDLE_QUEUE: Rgb = Rgb(0x62, 0x72, 0xA4);
/// CPU slot border.
pub const CPU_SLOT: Rgb = Rgb(0xBD, 0x93, 0xF9);
/// Blocked queue border.
pub const BLOCKED_QUEUE: Rgb = Rgb(0x8B, 0xE9, 0xFD);
/// Status line and labels.
pub const FOREGROUND: Rgb = Rgb(0xF8, 0xF8, 0xF2);
/// Quota gauge on a CPU border.
pub const QUOTA_GAUGE: Rgb = Rgb(0xFF, 0xB8, 0x6C);
/// Deadline markers on waiting tasks.
pub const DEADLINE: Rgb = Rgb(0xFF, 0x79, 0xC6);

/// Largest per-channel boost the arrival highlight adds.
const HIGHLIGHT_BOOST: f32 = 0x60 as f32;

/// Brighten `base` by the highlight `level` in [0, 1], clamping channels.
#[must_use]
pub fn highlight(base: Rgb, level: f32) -> Rgb {
    let boost = (HIGHLIGHT_BOOST * level.clamp(0.0, 1.0)).round() as u16;
    let lift = |c: u8| -> u8 { (u16::from(c) + boost).min(0xFF) as u8 };
    Rgb(lift(base.0), lift(base.1), lift(base.2))
}

/// Container border color by kind.
#[must_use]
pub fn container_color(kind: ContainerKind) -> Rgb {
    match kind {
        ContainerKind::Idle => IDLE_QUEUE,
        ContainerKind::Cpu => CPU_SLOT,
        ContainerKind::Blocked => BLOCKED_QUEUE,
    }
}

/// Task circle color by lifecycle state.
#[must_use]
pub fn task_color(state: TaskState) -> Rgb {
    match state {
        TaskState::Idle => Rgb(0xF1, 0xFA, 0x8C),
        TaskState::Running => Rgb(0x50, 0xFA, 0x7B),
        TaskState::Blocked => Rgb(0xFF, 0x55, 0x55),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_at_zero_is_identity() {
        assert_eq!(highlight(IDLE_QUEUE, 0.0), IDLE_QUEUE);
    }

    #[test]
    fn highlight_clamps_channels() {
        let bright = highlight(Rgb(0xF0, 0xF0, 0xF0), 1.0);
        assert_eq!(bright, Rgb(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn highlight_full_level_adds_boost() {
        let lifted = highlight(Rgb(0x10, 0x20, 0x30), 1.0);
        assert_eq!(lifted, Rgb(0x70, 0x80, 0x90));
    }

    #[test]
    fn highlight_out_of_range_level_is_clamped() {
        assert_eq!(highlight(IDLE_QUEUE, -3.0), IDLE_QUEUE);
        assert_eq!(highlight(Rgb(0, 0, 0), 9.0), Rgb(0x60, 0x60, 0x60));
    }
}
