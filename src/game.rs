use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use crossterm::style::Color;

use crate::TermInt;
use crate::canvas::{Canvas, Raster};
use crate::config::Config;
use crate::snake::{Snake, Grid, Direction::{*, self}};
use crate::term::Screen;

/// Ends the game loop once triggered. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fixed-rate tick deadlines.
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Ticker { period, next: now + period }
    }

    /// Time left before the next tick is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Consumes the tick that is due at `now`, if any.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        self.next += self.period;
        if self.next <= now {
            // Too far behind to catch up one tick at a time
            log::warn!("tick late by {:?}, skipping ahead", now - self.next);
            self.next = now + self.period;
        }
        true
    }
}

/// Clears the canvas and paints every body cell as a square.
pub fn render(canvas: &mut impl Canvas, snake: &Snake, cell_size: u32, color: Color) {
    let (width, height) = (canvas.width(), canvas.height());
    canvas.clear_rect(0, 0, width, height);

    for cell in snake.body() {
        // Cells are in bounds, so their coordinates are never negative
        let (x, y) = (cell.x as u32 * cell_size, cell.y as u32 * cell_size);
        canvas.fill_rect(x, y, cell_size, cell_size, color);
    }
}

/// Maps a key to the direction it steers in. Only the arrows steer.
pub fn steering_key(ev: &KeyEvent) -> Option<Direction> {
    match ev.code {
        KeyCode::Up => Some(Up),
        KeyCode::Down => Some(Down),
        KeyCode::Left => Some(Left),
        KeyCode::Right => Some(Right),
        _ => None,
    }
}

pub struct SnakeGame {
    config: Config,
    grid: Grid,
    snake: Snake,
    canvas: Raster,
    stop: StopHandle,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        let grid = config.grid().context("invalid game configuration")?;
        let snake = Snake::new(config.start, config.direction);
        let canvas = Raster::for_cells(config.canvas_width, config.canvas_height, config.cell_size);

        Ok(SnakeGame { config, grid, snake, canvas, stop: StopHandle::default() })
    }

    #[cfg(test)]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &Raster {
        &self.canvas
    }

    /// Applies a key press right away. Returns false for keys that do not
    /// steer or control the game.
    pub fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        if is_quit(ev) {
            log::info!("quit requested");
            self.stop.stop();
            return true;
        }

        match steering_key(ev) {
            Some(dir) => {
                self.snake.set_direction(dir);
                true
            }
            None => false,
        }
    }

    /// One update followed by one render.
    pub fn tick(&mut self) {
        let before = self.snake.get_direction();
        let (head, direction) = self.snake.step(self.grid);
        if direction != before {
            log::debug!("bounced {:?} -> {:?} at {:?}", before, direction, head);
        }
        render(&mut self.canvas, &self.snake, self.config.cell_size, self.config.color);
    }

    /// Runs the game on the terminal until the stop handle is triggered.
    /// Once setup has been attempted the terminal is always restored, and an
    /// error from the game takes precedence over one from restoring.
    pub fn run(&mut self, term: &mut impl Screen) -> Result<()> {
        let needed = self.canvas.size();
        let available = term.get_terminal_size();
        // Room for the border on every side
        ensure!(
            available.0 >= needed.0 + 2 && available.1 >= needed.1 + 2,
            "terminal is {}x{} but the game needs {}x{}",
            available.0, available.1, needed.0 + 2, needed.1 + 2
        );

        let res = term.setup()
            .context("failed to set up the terminal")
            .and_then(|_| self.play(term, needed));
        let restored = term.restore().context("failed to restore the terminal");
        res.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play(&mut self, term: &mut impl Screen, size: (TermInt, TermInt)) -> Result<()> {
        log::info!("starting on a {}x{} grid at {:?}", self.grid.cols, self.grid.rows, self.snake.head());
        term.draw_borders(size).context("failed to draw the border")?;

        // Every frame, the first included, is drawn after a step
        self.tick();
        term.present(&self.canvas).context("failed to draw a frame")?;

        let mut ticker = Ticker::new(self.config.tick, Instant::now());
        while !self.stop.is_stopped() {
            let key = term.poll_key(ticker.remaining(Instant::now())).context("failed to read input")?;
            if let Some(ev) = key {
                self.handle_key(&ev);
            }

            if ticker.poll_tick(Instant::now()) {
                self.tick();
                term.present(&self.canvas).context("failed to draw a frame")?;
            }
        }

        log::info!("stopped with the head at {:?}", self.snake.head());
        Ok(())
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
        || matches!(ev.code, KeyCode::Esc | KeyCode::Char('q'))
}
