use crate::{TermInt, Coords};
use crate::canvas::Raster;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal, Result};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

const FILLED_CHAR: char = '█';

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    origin: Coords,
    // What is currently on screen, used to only redraw changed glyphs
    front: Option<Raster>,
}

/// One glyph that differs between the screen and the next frame.
#[derive(Debug, PartialEq)]
pub struct GlyphChange {
    pub pos: Coords,
    pub color: Option<Color>,
}

/// Where the game is shown and where key presses come from.
pub trait Screen {
    fn get_terminal_size(&self) -> Coords;
    fn setup(&mut self) -> Result<()>;
    fn restore(&mut self) -> Result<()>;
    /// Waits up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>>;
    /// Draws a frame around a canvas of `size` glyphs.
    fn draw_borders(&mut self, size: Coords) -> Result<()>;
    fn present(&mut self, frame: &Raster) -> Result<()>;
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout(), origin: (1, 1), front: None })
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.front = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}

impl Screen for TermManager {
    fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.clear()
    }

    fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, LeaveAlternateScreen)
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if poll(timeout)? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    // The frame sits just outside the canvas area, which starts at the origin
    fn draw_borders(&mut self, size: Coords) -> Result<()> {
        let (inner_w, inner_h) = size;
        let (left, top) = (self.origin.0 - 1, self.origin.1 - 1);
        let (right, bottom) = (self.origin.0 + inner_w, self.origin.1 + inner_h);

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        self.flush()
    }

    // Only glyphs that differ from the previous frame are written
    fn present(&mut self, frame: &Raster) -> Result<()> {
        for change in diff(self.front.as_ref(), frame) {
            let pos = (self.origin.0 + change.pos.0, self.origin.1 + change.pos.1);
            match change.color {
                Some(color) => queue!(
                    self.stdout,
                    cursor::MoveTo(pos.0, pos.1),
                    style::SetForegroundColor(color),
                    style::Print(FILLED_CHAR),
                    style::ResetColor
                )?,
                None => self.print_at(pos, ' ')?,
            }
        }

        self.front = Some(frame.clone());
        self.flush()
    }
}

/// Glyphs to write so the screen showing `front` ends up showing `back`.
/// With nothing on screen yet, every painted glyph of `back` is written.
pub fn diff(front: Option<&Raster>, back: &Raster) -> Vec<GlyphChange> {
    let (cols, rows) = back.size();
    let mut changes = vec![];

    for row in 0..rows {
        for col in 0..cols {
            let color = back.glyph(col, row);
            let before = match front {
                Some(front) if front.size() == back.size() => front.glyph(col, row),
                _ => None,
            };
            if color != before {
                changes.push(GlyphChange { pos: (col, row), color });
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn test_first_frame_writes_painted_glyphs() {
        let mut frame = Raster::for_cells(100, 100, 20);
        frame.fill_rect(20, 20, 20, 20, Color::Green);

        let changes = diff(None, &frame);
        assert_eq!(changes, vec![
            GlyphChange { pos: (2, 1), color: Some(Color::Green) },
            GlyphChange { pos: (3, 1), color: Some(Color::Green) },
        ]);
    }

    #[test]
    fn test_moving_square_erases_old_glyphs() {
        let mut front = Raster::for_cells(100, 100, 20);
        front.fill_rect(0, 0, 20, 20, Color::Green);

        let mut back = Raster::for_cells(100, 100, 20);
        back.fill_rect(20, 0, 20, 20, Color::Green);

        let changes = diff(Some(&front), &back);
        assert_eq!(changes, vec![
            GlyphChange { pos: (0, 0), color: None },
            GlyphChange { pos: (1, 0), color: None },
            GlyphChange { pos: (2, 0), color: Some(Color::Green) },
            GlyphChange { pos: (3, 0), color: Some(Color::Green) },
        ]);
    }

    #[test]
    fn test_identical_frames_write_nothing() {
        let mut frame = Raster::for_cells(100, 100, 20);
        frame.fill_rect(40, 40, 20, 20, Color::Green);
        assert!(diff(Some(&frame.clone()), &frame).is_empty());
    }
}
