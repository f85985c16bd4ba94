#![forbid(unsafe_code)]

//! Cell-buffer painter.
//!
//! Implements the engine's [`Renderer`] over a flat character grid: grid
//! coordinates scale by the cell size, containers draw as rounded-border
//! boxes, tasks as circles with a progress gauge. The whole buffer is
//! repainted and presented every frame; at these sizes a diff pass would
//! buy nothing.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, SetForegroundColor};
use schedtui_sim::{ContainerView, GridPoint, Renderer, TaskView};

use crate::cli::SizePreset;
use crate::theme::{self, Rgb};

/// Scene width in grid columns.
const GRID_COLS: usize = 5;
/// Scene height in grid rows (leaves headroom for stacked CPU slots).
const GRID_ROWS: usize = 6;

/// Track color for the empty part of gauges.
const GAUGE_TRACK: Rgb = Rgb(0x44, 0x47, 0x5A);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: theme::FOREGROUND,
};

/// Character-cell renderer for the simulation scene.
#[derive(Debug)]
pub struct Painter {
    cell_w: usize,
    cell_h: usize,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Painter {
    #[must_use]
    pub fn new(size: SizePreset) -> Self {
        let (cell_w, cell_h) = match size {
            SizePreset::Small => (6, 3),
            SizePreset::Medium => (8, 4),
            SizePreset::Large => (10, 5),
        };
        let cols = GRID_COLS * cell_w;
        // One extra row for the status line.
        let rows = GRID_ROWS * cell_h + 1;
        Self {
            cell_w,
            cell_h,
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
        }
    }

    /// Wipe the buffer before a frame.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn put(&mut self, col: isize, row: isize, ch: char, fg: Rgb) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = Cell { ch, fg };
    }

    fn cell_col(&self, gx: f32) -> isize {
        (gx * self.cell_w as f32).round() as isize
    }

    fn cell_row(&self, gy: f32) -> isize {
        (gy * self.cell_h as f32).round() as isize
    }

    fn border_box(&mut self, origin: GridPoint, slot_rows: usize, color: Rgb) {
        let x0 = self.cell_col(origin.x);
        let y0 = self.cell_row(origin.y);
        let w = self.cell_w as isize;
        let h = (slot_rows * self.cell_h) as isize;
        let (x1, y1) = (x0 + w - 1, y0 + h - 1);

        self.put(x0, y0, '╭', color);
        self.put(x1, y0, '╮', color);
        self.put(x0, y1, '╰', color);
        self.put(x1, y1, '╯', color);
        for x in (x0 + 1)..x1 {
            self.put(x, y0, '─', color);
            self.put(x, y1, '─', color);
        }
        for y in (y0 + 1)..y1 {
            self.put(x0, y, '│', color);
            self.put(x1, y, '│', color);
        }
    }

    fn gauge(&mut self, col: isize, row: isize, width: usize, fraction: f32, fill: Rgb) {
        let filled = (fraction.clamp(0.0, 1.0) * width as f32).round() as usize;
        for i in 0..width {
            let (ch, fg) = if i < filled {
                ('█', fill)
            } else {
                ('░', GAUGE_TRACK)
            };
            self.put(col + i as isize, row, ch, fg);
        }
    }

    /// Write the status line into the bottom row.
    pub fn status(&mut self, text: &str) {
        let row = (self.rows - 1) as isize;
        for (i, ch) in text.chars().take(self.cols).enumerate() {
            self.put(i as isize, row, ch, theme::FOREGROUND);
        }
    }

    /// Flush the buffer to `out`, coalescing color changes per row.
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut current: Option<Rgb> = None;
        for row in 0..self.rows {
            queue!(out, MoveTo(0, row as u16))?;
            for col in 0..self.cols {
                let cell = self.cells[row * self.cols + col];
                if current != Some(cell.fg) {
                    queue!(out, SetForegroundColor(cell.fg.into()))?;
                    current = Some(cell.fg);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        Ok(())
    }
}

impl Renderer for Painter {
    fn container(&mut self, view: &ContainerView) {
        let color = theme::highlight(theme::container_color(view.kind), view.highlight);
        self.border_box(view.origin, view.rows, color);
        if let Some(quota) = view.quota {
            // Elapsed quota along the inside of the bottom border.
            let x0 = self.cell_col(view.origin.x) + 1;
            let y = self.cell_row(view.origin.y) + (view.rows * self.cell_h) as isize - 1;
            let width = self.cell_w.saturating_sub(2);
            self.gauge(x0, y, width, quota, theme::QUOTA_GAUGE);
        }
    }

    fn task(&mut self, view: &TaskView) {
        let cx = self.cell_col(view.center.x);
        let cy = self.cell_row(view.center.y);
        let color = theme::task_color(view.state);
        self.put(cx, cy, '●', color);

        let bar_w = self.cell_w / 2;
        let bar_x = cx - (bar_w / 2) as isize;
        self.gauge(bar_x, cy + 1, bar_w, view.progress, color);
        if let Some(deadline) = view.deadline {
            self.gauge(bar_x, cy - 1, bar_w, deadline, theme::DEADLINE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedtui_sim::{SimConfig, Simulation};

    fn buffer_text(painter: &Painter) -> String {
        painter.cells.iter().map(|c| c.ch).collect()
    }

    #[test]
    fn out_of_bounds_puts_are_dropped() {
        let mut painter = Painter::new(SizePreset::Small);
        painter.put(-1, 0, 'x', theme::FOREGROUND);
        painter.put(0, -1, 'x', theme::FOREGROUND);
        painter.put(10_000, 0, 'x', theme::FOREGROUND);
        painter.put(0, 10_000, 'x', theme::FOREGROUND);
        assert!(!buffer_text(&painter).contains('x'));
    }

    #[test]
    fn scene_paints_containers_and_tasks() {
        let sim = Simulation::new(SimConfig {
            task_count: 3,
            ..SimConfig::default()
        });
        let mut painter = Painter::new(SizePreset::Small);
        painter.clear();
        sim.render(&mut painter);
        let text = buffer_text(&painter);
        assert!(text.contains('╭'), "container borders painted");
        assert!(text.matches('●').count() == 3, "one circle per task");
    }

    #[test]
    fn status_line_is_truncated_to_width() {
        let mut painter = Painter::new(SizePreset::Small);
        let long = "x".repeat(500);
        painter.status(&long);
        let row = painter.rows - 1;
        let count = painter.cells[row * painter.cols..]
            .iter()
            .filter(|c| c.ch == 'x')
            .count();
        assert_eq!(count, painter.cols);
    }

    #[test]
    fn present_writes_every_row() {
        let mut painter = Painter::new(SizePreset::Small);
        painter.clear();
        let mut out = Vec::new();
        painter.present(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
