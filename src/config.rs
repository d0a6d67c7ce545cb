use std::time::Duration;

use anyhow::{bail, ensure, Result};
use crossterm::style::Color;

use crate::{GridInt, TermInt};
use crate::snake::{Cell, Direction, Grid};

pub const CELL_SIZE: u32 = 20;
pub const TICK_INTERVAL_MS: u64 = 100;
pub const CANVAS_WIDTH: u32 = 400;
pub const CANVAS_HEIGHT: u32 = 400;
pub const START_CELL: Cell = Cell::new(10, 10);
// Lime, independent of the terminal palette
pub const SNAKE_COLOR: Color = Color::Rgb { r: 0, g: 255, b: 0 };

pub const LOG_FILE: &str = "snake.log";
pub const LOG_LEVEL_VAR: &str = "SNAKE_LOG";

#[derive(Clone, Debug)]
pub struct Config {
    /// Side of one grid cell, in canvas pixels.
    pub cell_size: u32,
    pub tick: Duration,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub start: Cell,
    pub direction: Direction,
    pub color: Color,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cell_size: CELL_SIZE,
            tick: Duration::from_millis(TICK_INTERVAL_MS),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            start: START_CELL,
            direction: Direction::Right,
            color: SNAKE_COLOR,
        }
    }
}

impl Config {
    /// Derives the grid from the canvas size and checks that the game can
    /// start on it.
    ///
    /// A trailing partial cell still counts: a column is playable as long as
    /// it starts inside the canvas.
    pub fn grid(&self) -> Result<Grid> {
        ensure!(self.cell_size > 0, "cell size must be positive");
        ensure!(self.tick > Duration::from_millis(0), "tick interval must be positive");
        if self.canvas_width < self.cell_size || self.canvas_height < self.cell_size {
            bail!(
                "canvas {}x{} is smaller than one {}px cell",
                self.canvas_width, self.canvas_height, self.cell_size
            );
        }
        // A glyph never covers less than one pixel, so this bounds the raster too
        let max = TermInt::MAX as u32;
        ensure!(
            self.canvas_width <= max && self.canvas_height <= max,
            "canvas {}x{} is larger than {}x{}",
            self.canvas_width, self.canvas_height, max, max
        );

        let grid = Grid {
            cols: div_ceil(self.canvas_width, self.cell_size) as GridInt,
            rows: div_ceil(self.canvas_height, self.cell_size) as GridInt,
        };
        ensure!(grid.contains(self.start), "start cell {:?} is outside the {:?}", self.start, grid);

        Ok(grid)
    }
}

fn div_ceil(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}
