use std::collections::VecDeque;

use crate::GridInt;
use Direction::*;

/// A grid-aligned position, in cells rather than pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: GridInt,
    pub y: GridInt,
}

impl Cell {
    pub const fn new(x: GridInt, y: GridInt) -> Self {
        Cell { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit vector of this direction, with y growing downwards.
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Left | Right)
    }

    /// Negates the horizontal component. Vertical directions are unchanged.
    pub fn flip_x(self) -> Self {
        match self {
            Left => Right,
            Right => Left,
            other => other,
        }
    }

    /// Negates the vertical component. Horizontal directions are unchanged.
    pub fn flip_y(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            other => other,
        }
    }
}

/// Playable area in cells. Coordinates are valid in `[0, cols) x [0, rows)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cols: GridInt,
    pub rows: GridInt,
}

impl Grid {
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }
}

/// Computes the head after one step and the direction to keep moving in.
///
/// Each axis is resolved on its own: when the candidate coordinate leaves the
/// grid, that axis of the direction is negated and the coordinate is taken
/// from the old head plus the negated component, so the snake bounces back.
pub fn next_head(head: Cell, direction: Direction, grid: Grid) -> (Cell, Direction) {
    let mut direction = direction;

    let (dx, _) = direction.delta();
    let mut x = head.x + dx;
    if !(0..grid.cols).contains(&x) {
        direction = direction.flip_x();
        x = reflect(head.x, direction.delta().0, grid.cols);
    }

    let (_, dy) = direction.delta();
    let mut y = head.y + dy;
    if !(0..grid.rows).contains(&y) {
        direction = direction.flip_y();
        y = reflect(head.y, direction.delta().1, grid.rows);
    }

    (Cell::new(x, y), direction)
}

// A single-cell wide axis has nowhere to bounce to.
fn reflect(old: GridInt, component: GridInt, bound: GridInt) -> GridInt {
    let bounced = old + component;
    if (0..bound).contains(&bounced) { bounced } else { old }
}

pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(head: Cell, direction: Direction) -> Self {
        let mut body = VecDeque::with_capacity(1);
        body.push_front(head);
        Snake { body, direction }
    }

    /// Cells from head to tail.
    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        // The body is created with one cell and step() never shrinks it
        self.body[0]
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Moves one cell, bouncing off the edges of `grid`. Returns the new
    /// head and the direction the snake now moves in.
    pub fn step(&mut self, grid: Grid) -> (Cell, Direction) {
        let (new_head, direction) = next_head(self.head(), self.direction, grid);

        self.direction = direction;
        self.body.push_front(new_head);
        self.body.pop_back();

        (new_head, direction)
    }

    /// Turns towards `new_direction` unless the snake already moves along
    /// that axis. Returns whether the turn was taken.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        let accepted = new_direction.is_horizontal() != self.direction.is_horizontal();
        log::debug!(
            "steer {:?} while moving {:?}: {}",
            new_direction,
            self.direction,
            if accepted { "accepted" } else { "rejected" }
        );

        if accepted {
            self.direction = new_direction;
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: Grid = Grid { cols: 20, rows: 20 };

    #[test]
    fn test_step_without_input() {
        let mut snake = Snake::new(Cell::new(10, 10), Right);
        snake.step(GRID);
        assert_eq!(snake.head(), Cell::new(11, 10));
        assert_eq!(snake.get_direction(), Right);
        assert_eq!(snake.body().len(), 1);
    }

    #[test]
    fn test_bounce_off_right_edge() {
        let (head, dir) = next_head(Cell::new(19, 5), Right, GRID);
        assert_eq!(head, Cell::new(18, 5));
        assert_eq!(dir, Left);
    }

    #[test]
    fn test_bounce_off_every_edge() {
        assert_eq!(next_head(Cell::new(0, 5), Left, GRID), (Cell::new(1, 5), Right));
        assert_eq!(next_head(Cell::new(5, 0), Up, GRID), (Cell::new(5, 1), Down));
        assert_eq!(next_head(Cell::new(5, 19), Down, GRID), (Cell::new(5, 18), Up));

        // Moving along an edge does not bounce
        assert_eq!(next_head(Cell::new(0, 5), Down, GRID), (Cell::new(0, 6), Down));
        assert_eq!(next_head(Cell::new(19, 0), Left, GRID), (Cell::new(18, 0), Left));
    }

    #[test]
    fn test_walk_to_the_edge_and_back() {
        let mut snake = Snake::new(Cell::new(10, 10), Right);
        for _ in 0..9 {
            snake.step(GRID);
        }
        assert_eq!(snake.head(), Cell::new(19, 10));

        assert_eq!(snake.step(GRID), (Cell::new(18, 10), Left));
        assert_eq!(snake.get_direction(), Left);
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![Cell::new(18, 10)]);

        snake.step(GRID);
        assert_eq!(snake.head(), Cell::new(17, 10));
    }

    #[test]
    fn test_single_cell_axis_stays_in_place() {
        let grid = Grid { cols: 1, rows: 3 };
        let (head, dir) = next_head(Cell::new(0, 1), Right, grid);
        assert_eq!(head, Cell::new(0, 1));
        assert_eq!(dir, Left);

        let (head, dir) = next_head(head, dir, grid);
        assert_eq!(head, Cell::new(0, 1));
        assert_eq!(dir, Right);
    }

    #[test]
    fn test_head_always_in_bounds() {
        let grids = [
            Grid { cols: 20, rows: 20 },
            Grid { cols: 7, rows: 3 },
            Grid { cols: 2, rows: 1 },
            Grid { cols: 1, rows: 1 },
        ];
        let turns = [Down, Left, Up, Right];

        for grid in grids.iter() {
            let mut snake = Snake::new(Cell::new(0, 0), Right);
            for i in 0..500 {
                if i % 13 == 0 {
                    snake.set_direction(turns[(i / 13) % turns.len()]);
                }
                snake.step(*grid);
                assert!(grid.contains(snake.head()), "{:?} left {:?}", snake.head(), grid);
                assert_eq!(snake.body().len(), 1);
            }
        }
    }

    #[test]
    fn test_steering_while_moving_right() {
        let mut snake = Snake::new(Cell::new(10, 10), Right);
        assert!(!snake.set_direction(Left));
        assert!(!snake.set_direction(Right));
        assert_eq!(snake.get_direction(), Right);

        assert!(snake.set_direction(Up));
        assert_eq!(snake.get_direction(), Up);
        assert_eq!(Up.delta(), (0, -1));
    }

    #[test]
    fn test_steering_while_moving_down() {
        let mut snake = Snake::new(Cell::new(10, 10), Down);
        assert!(!snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert!(snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Left);
    }

    #[test]
    fn test_turn_applies_on_next_step() {
        let mut snake = Snake::new(Cell::new(10, 10), Right);
        snake.set_direction(Down);
        assert_eq!(snake.head(), Cell::new(10, 10));
        snake.step(GRID);
        assert_eq!(snake.head(), Cell::new(10, 11));
    }
}
