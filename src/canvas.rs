use crossterm::style::Color;

use crate::TermInt;

/// A pixel-addressed drawing surface.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear_rect(&mut self, x: u32, y: u32, w: u32, h: u32);
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color);
}

/// A canvas rasterized onto terminal character cells.
///
/// Each glyph covers `px_per_col x px_per_row` pixels. A glyph is painted
/// when any of its pixels is covered by the rectangle being drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    px_per_col: u32,
    px_per_row: u32,
    cols: TermInt,
    rows: TermInt,
    glyphs: Vec<Option<Color>>,
}

impl Raster {
    /// Glyphs are roughly twice as tall as they are wide, so a square of
    /// `cell_size` pixels takes two columns and one row.
    pub fn for_cells(width: u32, height: u32, cell_size: u32) -> Self {
        let px_per_row = cell_size.max(1);
        let px_per_col = (cell_size / 2).max(1);
        Raster::new(width, height, px_per_col, px_per_row)
    }

    pub fn new(width: u32, height: u32, px_per_col: u32, px_per_row: u32) -> Self {
        let cols = span_end(width, px_per_col);
        let rows = span_end(height, px_per_row);
        let glyphs = vec![None; cols as usize * rows as usize];
        Raster { width, height, px_per_col, px_per_row, cols, rows, glyphs }
    }

    /// Size in terminal cells.
    pub fn size(&self) -> (TermInt, TermInt) {
        (self.cols, self.rows)
    }

    pub fn glyph(&self, col: TermInt, row: TermInt) -> Option<Color> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.glyphs[self.index(col, row)]
    }

    fn index(&self, col: TermInt, row: TermInt) -> usize {
        self.cols as usize * row as usize + col as usize
    }

    fn paint(&mut self, x: u32, y: u32, w: u32, h: u32, value: Option<Color>) {
        // Clip to the canvas before mapping to glyphs
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }

        let cols = span_start(x, self.px_per_col)..span_end(x_end, self.px_per_col).min(self.cols);
        let rows = span_start(y, self.px_per_row)..span_end(y_end, self.px_per_row).min(self.rows);

        for row in rows {
            for col in cols.clone() {
                let i = self.index(col, row);
                self.glyphs[i] = value;
            }
        }
    }
}

// Both saturate at the largest terminal coordinate.
fn span_start(px: u32, px_per_glyph: u32) -> TermInt {
    (px / px_per_glyph).min(TermInt::MAX as u32) as TermInt
}

// Number of glyphs needed to cover `px` pixels.
fn span_end(px: u32, px_per_glyph: u32) -> TermInt {
    let glyphs = (px as u64 + px_per_glyph as u64 - 1) / px_per_glyph as u64;
    glyphs.min(TermInt::MAX as u64) as TermInt
}

impl Canvas for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.paint(x, y, w, h, None);
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.paint(x, y, w, h, Some(color));
    }
}
